//! Style configuration for plot rendering.
//!
//! Styles are JSON documents holding named color-stop ramps:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "styles": {
//!     "soil_temperature": {
//!       "name": "Soil temperature",
//!       "units": "K",
//!       "stops": [
//!         {"value": 0, "color": "#313695"},
//!         {"value": 1, "color": "#A50026"}
//!       ]
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{RenderError, Result};
use crate::gradient::{Color, ColorRamp};

/// Style configuration loaded from JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleConfig {
    pub version: String,
    pub styles: HashMap<String, StyleDefinition>,
}

/// A single style definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleDefinition {
    pub name: String,
    pub description: Option<String>,
    pub units: Option<String>,
    pub stops: Vec<ColorStop>,
    pub legend: Option<Legend>,
}

/// Color stop for gradient
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: String,
    pub label: Option<String>,
}

/// Legend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Legend {
    pub title: Option<String>,
    pub ticks: Option<u32>,
}

impl StyleConfig {
    /// Load style configuration from JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load style configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Style(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Get a specific style definition
    pub fn get_style(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.get(name)
    }

    /// Look up `name`, failing if the file does not define it.
    pub fn require_style(&self, name: &str) -> Result<&StyleDefinition> {
        self.get_style(name)
            .ok_or_else(|| RenderError::Style(format!("no style named '{}'", name)))
    }

    /// Look up `name` and build its color ramp.
    pub fn ramp(&self, name: &str) -> Result<ColorRamp> {
        self.require_style(name)?.ramp()
    }
}

impl StyleDefinition {
    /// Color ramp from this style's stops.
    pub fn ramp(&self) -> Result<ColorRamp> {
        let stops = self
            .stops
            .iter()
            .map(|stop| {
                let (r, g, b) = hex_to_rgb(&stop.color).ok_or_else(|| {
                    RenderError::Style(format!(
                        "style '{}' has invalid color '{}'",
                        self.name, stop.color
                    ))
                })?;
                Ok((stop.value, Color::opaque(r, g, b)))
            })
            .collect::<Result<Vec<_>>>()?;
        ColorRamp::new(stops)
    }

    /// Number of colorbar ticks, at least 2.
    pub fn tick_count(&self) -> u32 {
        self.legend
            .as_ref()
            .and_then(|l| l.ticks)
            .unwrap_or(5)
            .max(2)
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("00ff7f"), Some((0, 255, 127)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
    }
}
