//! Grid metadata reader.
//!
//! A model configuration ships one `grid_info.nc` describing how its land
//! points sit on the regular lat/lon grid: a 2D `land_index` field (offset of
//! each cell on the land-point axis, fill for ocean) plus 2D latitude and
//! longitude fields of the same shape.

use std::path::Path;

use climate_common::{GridInfo, GridShape, LandIndexGrid};
use tracing::{debug, info};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{self, NC_FILL_INT};

/// Variable names to read from the grid metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFieldNames {
    pub land_index: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for GridFieldNames {
    fn default() -> Self {
        Self {
            land_index: "land_index".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

/// Load the land index grid and coordinates from a grid metadata file.
///
/// Cells holding the fill value (declared, or the NetCDF integer default) are
/// masked. Any other negative index is rejected. The file is closed before
/// returning.
pub fn load_grid_info<P: AsRef<Path>>(path: P, names: &GridFieldNames) -> NetCdfResult<GridInfo> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(NetCdfError::NotFound(path.to_path_buf()));
    }

    info!(path = %path.display(), "Reading grid data");
    let file = native::open(path)?;

    let index_var = native::require_variable(&file, &names.land_index)?;
    let dims = native::dimension_lengths(&index_var);
    let shape = match dims.as_slice() {
        [height, width] => GridShape::new(*height, *width),
        other => {
            return Err(NetCdfError::InvalidFormat(format!(
                "{} must be 2D (lat, lon), found {} dimensions",
                names.land_index,
                other.len()
            )))
        }
    };

    let raw = native::read_values_f64(&index_var)?;
    let fill = native::fill_value(&index_var).unwrap_or(NC_FILL_INT as f64);

    let mut indices = Vec::with_capacity(raw.len());
    let mut mask = Vec::with_capacity(raw.len());
    for &v in &raw {
        let invalid = v == fill || !v.is_finite();
        if !invalid && v.fract() != 0.0 {
            return Err(NetCdfError::InvalidFormat(format!(
                "{} holds non-integer value {}",
                names.land_index, v
            )));
        }
        indices.push(if invalid { -1 } else { v as i64 });
        mask.push(invalid);
    }
    let index = LandIndexGrid::new(shape, indices, mask)?;

    let latitudes = read_coordinate(&file, &names.latitude)?;
    let longitudes = read_coordinate(&file, &names.longitude)?;

    let grid = GridInfo::new(index, latitudes, longitudes)?;
    grid.validate()?;

    debug!(
        height = shape.height,
        width = shape.width,
        land_points = grid.index.valid_count(),
        "Loaded grid metadata"
    );

    Ok(grid)
}

fn read_coordinate(file: &netcdf::File, name: &str) -> NetCdfResult<Vec<f32>> {
    let var = native::require_variable(file, name)?;
    let raw = native::read_values_f64(&var)?;
    Ok(native::fill_to_nan(&raw, native::fill_value(&var)))
}
