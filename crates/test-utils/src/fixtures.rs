//! NetCDF fixtures mirroring JULES land-point output.
//!
//! Files are written with the `netcdf` crate so the readers under test see
//! real NetCDF-4 files, and archived with `flate2` the way yearly dumps are
//! stored on disk.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::FixtureResult;

/// Fill value written into fixture land index grids.
pub const LAND_INDEX_FILL: i32 = -1;

/// Default yearly dump template, relative to the data directory.
pub const DUMP_TEMPLATE: &str = "{gcm}/BL_{gcm}.dump.{year}0101.0.nc";

/// Default grid metadata path, relative to the data directory.
pub const GRID_INFO_PATH: &str = "ancillary/grid_info.nc";

/// Write a grid metadata file with `land_index`, `latitude` and `longitude`
/// on dimensions `(y, x)`.
///
/// `land_index` uses [`LAND_INDEX_FILL`] for ocean cells; it is declared as
/// the variable's `_FillValue`.
pub fn write_grid_info(
    path: &Path,
    height: usize,
    width: usize,
    land_index: &[i32],
    latitudes: &[f32],
    longitudes: &[f32],
) -> FixtureResult<()> {
    ensure_parent(path)?;
    let mut file = netcdf::create(path)?;
    file.add_dimension("y", height)?;
    file.add_dimension("x", width)?;

    {
        let mut var = file.add_variable::<i32>("land_index", &["y", "x"])?;
        var.put_attribute("_FillValue", LAND_INDEX_FILL)?;
        var.put_values(land_index, ..)?;
    }
    {
        let mut var = file.add_variable::<f32>("latitude", &["y", "x"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_values(latitudes, ..)?;
    }
    {
        let mut var = file.add_variable::<f32>("longitude", &["y", "x"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_values(longitudes, ..)?;
    }

    Ok(())
}

/// Write a grid metadata file from a land index, generating regular
/// coordinates (rows from -90 upwards, columns from -180 eastwards).
pub fn write_regular_grid_info(
    path: &Path,
    height: usize,
    width: usize,
    land_index: &[i32],
) -> FixtureResult<()> {
    let (lats, lons) = crate::generators::regular_coordinates(height, width);
    write_grid_info(path, height, width, land_index, &lats, &lons)
}

/// Write a yearly dump holding `variable` on dimensions `(soil, land)`.
///
/// `values` is layer-major: `layers` rows of `n_land` values.
pub fn write_dump(
    path: &Path,
    variable: &str,
    layers: usize,
    n_land: usize,
    values: &[f32],
) -> FixtureResult<()> {
    ensure_parent(path)?;
    let mut file = netcdf::create(path)?;
    file.add_dimension("soil", layers)?;
    file.add_dimension("land", n_land)?;

    let mut var = file.add_variable::<f32>(variable, &["soil", "land"])?;
    var.put_attribute("units", "K")?;
    var.put_values(values, ..)?;
    Ok(())
}

/// gzip `path` to `<path>.gz` and remove the plain file.
pub fn gzip_file(path: &Path) -> FixtureResult<PathBuf> {
    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);

    let mut encoder = GzEncoder::new(File::create(&gz_path)?, Compression::default());
    io::copy(&mut BufReader::new(File::open(path)?), &mut encoder)?;
    encoder.finish()?.flush()?;
    fs::remove_file(path)?;
    Ok(gz_path)
}

/// Write `contents` gzip-compressed to `<path>.gz` (no plain file left).
pub fn write_gz_bytes(path: &Path, contents: &[u8]) -> FixtureResult<PathBuf> {
    ensure_parent(path)?;
    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);

    let mut encoder = GzEncoder::new(File::create(&gz_path)?, Compression::default());
    encoder.write_all(contents)?;
    encoder.finish()?.flush()?;
    Ok(gz_path)
}

/// Resolve [`DUMP_TEMPLATE`] for one model year.
pub fn dump_path(data_dir: &Path, gcm: &str, year: i32) -> PathBuf {
    data_dir.join(
        DUMP_TEMPLATE
            .replace("{gcm}", gcm)
            .replace("{year}", &format!("{:04}", year)),
    )
}

/// A data directory laid out like a model archive: grid metadata plus one
/// archived dump per year.
#[derive(Debug)]
pub struct ModelArchive {
    pub data_dir: PathBuf,
    pub gcm: String,
    pub variable: String,
    pub years: RangeInclusive<i32>,
    pub layers: usize,
    pub n_land: usize,
}

impl ModelArchive {
    /// Build an archive under `data_dir`.
    ///
    /// `value(year, layer, land_point)` gives every stored value. The grid is
    /// `height x width` with `land_index` in row-major order.
    #[allow(clippy::too_many_arguments)]
    pub fn build<F>(
        data_dir: &Path,
        gcm: &str,
        variable: &str,
        years: RangeInclusive<i32>,
        layers: usize,
        height: usize,
        width: usize,
        land_index: &[i32],
        value: F,
    ) -> FixtureResult<Self>
    where
        F: Fn(i32, usize, usize) -> f32,
    {
        let n_land = land_index.iter().filter(|&&i| i != LAND_INDEX_FILL).count();
        write_regular_grid_info(&data_dir.join(GRID_INFO_PATH), height, width, land_index)?;

        for year in years.clone() {
            let values: Vec<f32> = (0..layers)
                .flat_map(|layer| (0..n_land).map(move |land| (layer, land)))
                .map(|(layer, land)| value(year, layer, land))
                .collect();
            let path = dump_path(data_dir, gcm, year);
            write_dump(&path, variable, layers, n_land, &values)?;
            gzip_file(&path)?;
        }

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            gcm: gcm.to_string(),
            variable: variable.to_string(),
            years,
            layers,
            n_land,
        })
    }

    /// Plain (uncompressed) dump path for one year.
    pub fn dump_path(&self, year: i32) -> PathBuf {
        dump_path(&self.data_dir, &self.gcm, year)
    }

    /// Whether every year currently sits gzip-compressed with no plain copy.
    pub fn all_compressed(&self) -> bool {
        self.years.clone().all(|year| {
            let plain = self.dump_path(year);
            let mut gz = plain.as_os_str().to_owned();
            gz.push(".gz");
            PathBuf::from(gz).is_file() && !plain.exists()
        })
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
