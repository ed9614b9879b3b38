//! Tests for style parsing and ramp construction.

use renderer::gradient::Color;
use renderer::{RenderError, StyleConfig};

const STYLE: &str = r##"{
    "version": "1.0",
    "styles": {
        "soil": {
            "name": "Soil temperature",
            "units": "K",
            "stops": [
                {"value": 250, "color": "#000000"},
                {"value": 275, "color": "#FF0000", "label": "freezing"},
                {"value": 300, "color": "#FFFFFF"}
            ],
            "legend": {"title": "K", "ticks": 3}
        },
        "broken": {
            "name": "Broken",
            "stops": [{"value": 0, "color": "red"}]
        }
    }
}"##;

#[test]
fn test_parse_style_config() {
    let config = StyleConfig::from_json(STYLE).unwrap();
    let style = config.get_style("soil").unwrap();

    assert_eq!(style.stops.len(), 3);
    assert_eq!(style.units.as_deref(), Some("K"));
    assert_eq!(style.stops[1].label.as_deref(), Some("freezing"));
    assert_eq!(style.tick_count(), 3);
}

#[test]
fn test_ramp_from_style_uses_relative_stop_positions() {
    let ramp = StyleConfig::from_json(STYLE).unwrap().ramp("soil").unwrap();

    assert_eq!(ramp.color_at(0.0), Color::BLACK);
    assert_eq!(ramp.color_at(0.5), Color::opaque(255, 0, 0));
    assert_eq!(ramp.color_at(1.0), Color::WHITE);
}

#[test]
fn test_bad_color_rejected() {
    let err = StyleConfig::from_json(STYLE).unwrap().ramp("broken").unwrap_err();
    assert!(matches!(err, RenderError::Style(_)));
}

#[test]
fn test_unknown_style_rejected() {
    let err = StyleConfig::from_json(STYLE).unwrap().ramp("nope").unwrap_err();
    assert!(matches!(err, RenderError::Style(_)));
}

#[test]
fn test_invalid_json_rejected() {
    assert!(matches!(
        StyleConfig::from_json("{ not json"),
        Err(RenderError::Style(_))
    ));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("styles.json");
    std::fs::write(&path, STYLE).unwrap();

    let config = StyleConfig::from_file(&path).unwrap();
    assert_eq!(config.version, "1.0");
    assert!(StyleConfig::from_file(&dir.path().join("missing.json")).is_err());
}
