//! Integration tests for the yearly dump loader and grid metadata reader.
//!
//! Fixtures are real NetCDF-4 files written into a temp directory and
//! archived with gzip, matching the on-disk layout of model output.

use netcdf_parser::{
    compression_state, load_grid_info, CompressionState, FileTemplate, GridFieldNames,
    NetCdfError, YearlyLoader,
};
use test_utils::{
    dump_path, gzip_file, sequential_land_index, warming_soil, write_dump, write_gz_bytes,
    write_regular_grid_info, ModelArchive, DUMP_TEMPLATE, GRID_INFO_PATH,
};

const GCM: &str = "CEN_TEST_MOD_unit-1";

fn archive(dir: &std::path::Path, layers: usize) -> ModelArchive {
    let index = sequential_land_index(2, 3, &[5]);
    ModelArchive::build(dir, GCM, "t_soil", 2000..=2002, layers, 2, 3, &index, |y, l, p| {
        warming_soil(y, l, p, 2000, 0.1)
    })
    .expect("fixture archive")
}

fn loader(dir: &std::path::Path) -> YearlyLoader {
    YearlyLoader::new(dir, FileTemplate::new(DUMP_TEMPLATE))
}

// ============================================================================
// load_year
// ============================================================================

#[test]
fn test_load_year_averages_selected_layers() {
    let dir = tempfile::tempdir().unwrap();
    let archive = archive(dir.path(), 6);

    let values = loader(dir.path())
        .load_year(GCM, 2001, "t_soil", 0, 5)
        .expect("load");

    assert_eq!(values.len(), archive.n_land);
    for (land, v) in values.iter().enumerate() {
        // layers 0..5 cool by 0.5 K each: mean offset -1.0
        let expected = 270.0 + land as f32 + 0.1 - 1.0;
        assert!((v - expected).abs() < 1e-4, "point {}: {} vs {}", land, v, expected);
    }
}

#[test]
fn test_load_year_single_layer_matches_generic_average() {
    let dir = tempfile::tempdir().unwrap();
    archive(dir.path(), 4);
    let loader = loader(dir.path());

    let single = loader.load_year(GCM, 2002, "t_soil", 2, 1).unwrap();
    for (land, v) in single.iter().enumerate() {
        assert_eq!(*v, warming_soil(2002, 2, land, 2000, 0.1));
    }
}

#[test]
fn test_load_year_reads_only_offset_layers() {
    let dir = tempfile::tempdir().unwrap();
    archive(dir.path(), 6);

    let values = loader(dir.path()).load_year(GCM, 2000, "t_soil", 2, 3).unwrap();

    for (land, v) in values.iter().enumerate() {
        // layers 2..5 average to layer 3: -1.5 K
        let expected = 270.0 + land as f32 - 1.5;
        assert!((v - expected).abs() < 1e-4, "point {}: {} vs {}", land, v, expected);
    }
}

#[test]
fn test_load_year_leaves_archive_compressed() {
    let dir = tempfile::tempdir().unwrap();
    let archive = archive(dir.path(), 3);
    assert!(archive.all_compressed());

    loader(dir.path()).load_year(GCM, 2000, "t_soil", 0, 3).unwrap();

    assert!(archive.all_compressed());
    assert_eq!(
        compression_state(&archive.dump_path(2000)),
        CompressionState::Compressed
    );
}

#[test]
fn test_load_year_recompresses_after_read_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dump_path(dir.path(), GCM, 1999);
    // Valid gzip, invalid NetCDF: decompression succeeds, the read throws.
    write_gz_bytes(&path, b"this is not a netcdf file").unwrap();

    let err = loader(dir.path())
        .load_year(GCM, 1999, "t_soil", 0, 1)
        .unwrap_err();

    assert!(matches!(err, NetCdfError::InvalidFormat(_)), "{:?}", err);
    assert_eq!(compression_state(&path), CompressionState::Compressed);
}

#[test]
fn test_load_year_missing_variable() {
    let dir = tempfile::tempdir().unwrap();
    let archive = archive(dir.path(), 2);

    let err = loader(dir.path())
        .load_year(GCM, 2000, "t_air", 0, 1)
        .unwrap_err();

    assert!(matches!(err, NetCdfError::MissingData(_)), "{:?}", err);
    assert!(archive.all_compressed());
}

#[test]
fn test_load_year_layers_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let archive = archive(dir.path(), 4);

    let err = loader(dir.path())
        .load_year(GCM, 2000, "t_soil", 2, 5)
        .unwrap_err();

    assert!(matches!(err, NetCdfError::Validation(_)), "{:?}", err);
    assert!(archive.all_compressed());
}

#[test]
fn test_load_year_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader(dir.path())
        .load_year(GCM, 1850, "t_soil", 0, 1)
        .unwrap_err();
    assert!(matches!(err, NetCdfError::NotFound(_)));
}

#[test]
fn test_load_year_reads_plain_file_without_archiving() {
    let dir = tempfile::tempdir().unwrap();
    let path = dump_path(dir.path(), GCM, 2010);
    write_dump(&path, "t_soil", 1, 3, &[1.0, 2.0, 3.0]).unwrap();

    let values = loader(dir.path()).load_year(GCM, 2010, "t_soil", 0, 1).unwrap();

    assert_eq!(values, vec![1.0, 2.0, 3.0]);
    assert_eq!(compression_state(&path), CompressionState::Uncompressed);
}

#[test]
fn test_zero_layer_count_rejected_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dump_path(dir.path(), GCM, 2000);
    write_dump(&path, "t_soil", 1, 2, &[1.0, 2.0]).unwrap();
    gzip_file(&path).unwrap();

    let err = loader(dir.path()).load_year(GCM, 2000, "t_soil", 0, 0).unwrap_err();

    assert!(matches!(err, NetCdfError::Validation(_)));
    assert_eq!(compression_state(&path), CompressionState::Compressed);
}

// ============================================================================
// load_grid_info
// ============================================================================

#[test]
fn test_load_grid_info_masks_fill_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(GRID_INFO_PATH);
    write_regular_grid_info(&path, 2, 2, &[0, 1, 2, -1]).unwrap();

    let grid = load_grid_info(&path, &GridFieldNames::default()).unwrap();

    assert_eq!(grid.shape().height, 2);
    assert_eq!(grid.shape().width, 2);
    assert_eq!(grid.index.get(0, 0), Some(0));
    assert_eq!(grid.index.get(1, 0), Some(2));
    assert_eq!(grid.index.get(1, 1), None);
    assert_eq!(grid.latitudes.len(), 4);
    assert_eq!(grid.longitudes.len(), 4);
}

#[test]
fn test_load_grid_info_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_grid_info(dir.path().join("nope.nc"), &GridFieldNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::NotFound(_)));
}

#[test]
fn test_load_grid_info_missing_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(GRID_INFO_PATH);
    write_regular_grid_info(&path, 1, 2, &[0, 1]).unwrap();

    let names = GridFieldNames {
        latitude: "lat2d".to_string(),
        ..GridFieldNames::default()
    };
    let err = load_grid_info(&path, &names).unwrap_err();
    assert!(matches!(err, NetCdfError::MissingData(_)));
}

#[test]
fn test_load_grid_info_rejects_duplicate_indices() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(GRID_INFO_PATH);
    write_regular_grid_info(&path, 1, 3, &[0, 1, 1]).unwrap();

    let err = load_grid_info(&path, &GridFieldNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::Validation(_)));
}

#[test]
fn test_load_grid_info_rejects_negative_index_on_land_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(GRID_INFO_PATH);
    // -1 is the declared fill, -5 is corrupt
    write_regular_grid_info(&path, 1, 4, &[0, -5, 1, -1]).unwrap();

    let err = load_grid_info(&path, &GridFieldNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::Validation(_)), "{:?}", err);
}
