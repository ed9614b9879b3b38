//! End-to-end runs against a synthetic model archive.

use std::fs;
use std::path::{Path, PathBuf};

use climate_common::{Catalog, ClimateError};
use soil_plotter::pipeline::load_and_reduce;
use soil_plotter::{run, PlotterConfig};
use test_utils::{
    sequential_land_index, warming_soil, write_regular_grid_info, ModelArchive, GRID_INFO_PATH,
};

const GCM: &str = "CEN_TEST_MOD_alpha";

struct Fixture {
    _dir: tempfile::TempDir,
    archive: ModelArchive,
    config: PlotterConfig,
    catalog: Catalog,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("output");
    fs::create_dir_all(&output_dir).unwrap();

    // 3x4 grid, corners are ocean
    let index = sequential_land_index(3, 4, &[0, 3, 8, 11]);
    let archive = ModelArchive::build(&data_dir, GCM, "t_soil", 2000..=2004, 6, 3, 4, &index, |y, l, p| {
        warming_soil(y, l, p, 2000, 0.1)
    })
    .unwrap();

    let config = PlotterConfig {
        data_dir,
        output_dir,
        start_year: 2000,
        end_year: 2004,
        ..PlotterConfig::default()
    };
    let catalog = Catalog::new(["CEN_TEST_MOD_other", GCM]).unwrap();

    Fixture {
        _dir: dir,
        archive,
        config,
        catalog,
    }
}

fn pngs_in(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    found.retain(|p| p.extension().is_some_and(|ext| ext == "png"));
    found.sort();
    found
}

#[test]
fn test_run_writes_three_plots_and_restores_archive() {
    let f = fixture();

    let summary = run(&f.config, &f.catalog, 2).unwrap();

    assert_eq!(summary.model_id, GCM);
    assert_eq!(summary.years, 5);
    assert_eq!(summary.land_points, 8);
    let mut expected = vec![
        f.config.output_dir.join(format!("{}_Global_MeanGrowth_t_soil_Map.png", GCM)),
        f.config.output_dir.join(format!("{}_Global_Mean_t_soil_Map.png", GCM)),
        f.config.output_dir.join(format!("{}_Global_Mean_t_soil_Timeseries.png", GCM)),
    ];
    expected.sort();
    assert_eq!(pngs_in(&f.config.output_dir), expected);

    for path in &expected {
        let img = image::open(path).unwrap();
        assert!(img.width() > 0 && img.height() > 0);
    }
    assert!(f.archive.all_compressed());
}

#[test]
fn test_reductions_follow_the_data() {
    let f = fixture();

    let r = load_and_reduce(&f.config, GCM).unwrap();

    // layers 0..5 average -1.0 K, years 2000..=2004 average +0.2 K
    for (land, mean) in r.mean.iter().enumerate() {
        assert!((mean - (269.2 + land as f32)).abs() < 1e-3);
    }
    assert!(r.growth.iter().all(|g| (g - 0.1).abs() < 1e-3));
    assert_eq!(r.timeseries.len(), 5);
    assert!(r.timeseries.windows(2).all(|w| w[1] > w[0]));
    assert!(f.archive.all_compressed());
}

#[test]
fn test_bad_index_is_usage_error() {
    let f = fixture();

    for index in [0, 3] {
        let err = run(&f.config, &f.catalog, index).unwrap_err();
        assert!(matches!(err, ClimateError::Usage(_)), "{:?}", err);
        assert_eq!(err.exit_code(), 2);
    }
    assert!(pngs_in(&f.config.output_dir).is_empty());
}

#[test]
fn test_missing_output_dir_is_resource_error() {
    let mut f = fixture();
    f.config.output_dir = f.config.output_dir.join("missing");

    let err = run(&f.config, &f.catalog, 2).unwrap_err();

    assert!(matches!(err, ClimateError::Resource(_)), "{:?}", err);
    assert!(!f.config.output_dir.exists());
    assert!(f.archive.all_compressed());
}

#[test]
fn test_missing_year_aborts_without_output() {
    let f = fixture();
    let mut gz = f.archive.dump_path(2003).into_os_string();
    gz.push(".gz");
    fs::remove_file(PathBuf::from(gz)).unwrap();

    let err = run(&f.config, &f.catalog, 2).unwrap_err();

    assert!(matches!(err, ClimateError::Resource(_)), "{:?}", err);
    assert!(pngs_in(&f.config.output_dir).is_empty());
    for year in [2000, 2001, 2002, 2004] {
        assert!(!f.archive.dump_path(year).exists(), "year {} left uncompressed", year);
    }
}

#[test]
fn test_single_year_is_validation_error() {
    let mut f = fixture();
    f.config.end_year = f.config.start_year;

    let err = run(&f.config, &f.catalog, 2).unwrap_err();

    assert!(matches!(err, ClimateError::Validation(_)), "{:?}", err);
    assert_eq!(err.exit_code(), 4);
    assert!(pngs_in(&f.config.output_dir).is_empty());
}

#[test]
fn test_grid_index_past_land_points_is_validation_error() {
    let f = fixture();
    // valid cell pointing at land point 40 of 8
    let mut index = sequential_land_index(3, 4, &[0, 3, 8, 11]);
    index[5] = 40;
    write_regular_grid_info(&f.config.data_dir.join(GRID_INFO_PATH), 3, 4, &index).unwrap();

    let err = run(&f.config, &f.catalog, 2).unwrap_err();

    assert!(matches!(err, ClimateError::Validation(_)), "{:?}", err);
    assert!(pngs_in(&f.config.output_dir).is_empty());
    assert!(f.archive.all_compressed());
}

#[test]
fn test_missing_grid_file_is_resource_error() {
    let f = fixture();
    fs::remove_file(f.config.data_dir.join(GRID_INFO_PATH)).unwrap();

    let err = run(&f.config, &f.catalog, 2).unwrap_err();
    assert!(matches!(err, ClimateError::Resource(_)), "{:?}", err);
}
