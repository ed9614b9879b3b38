//! Yearly dump reader.
//!
//! Each model year is archived as one gzip-compressed land-point dump. The
//! reader resolves the file from a path template, decompresses it in place
//! for the duration of the read, averages the requested depth layers and
//! recompresses it.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::{NetCdfError, NetCdfResult};
use crate::gzip::DecompressedFile;
use crate::native;

/// Placeholder for the model identifier in a file template.
pub const GCM_PLACEHOLDER: &str = "{gcm}";

/// Placeholder for the 4-digit year in a file template.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Relative path of a yearly dump with model and year placeholders,
/// e.g. `{gcm}/BL_{gcm}.dump.{year}0101.0.nc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTemplate(String);

impl FileTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the template varies by year. Without it every year reads the
    /// same file.
    pub fn has_year(&self) -> bool {
        self.0.contains(YEAR_PLACEHOLDER)
    }

    /// Substitute the model identifier and zero-padded 4-digit year.
    pub fn resolve(&self, gcm: &str, year: i32) -> String {
        self.0
            .replace(GCM_PLACEHOLDER, gcm)
            .replace(YEAR_PLACEHOLDER, &format!("{:04}", year))
    }
}

/// Contiguous range of depth layers `[start, start + count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSelection {
    pub start: usize,
    pub count: usize,
}

impl LayerSelection {
    pub fn new(start: usize, count: usize) -> NetCdfResult<Self> {
        if count == 0 {
            return Err(NetCdfError::Validation(
                "layer count must be at least 1".to_string(),
            ));
        }
        Ok(Self { start, count })
    }

    /// One past the last selected layer.
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    fn check(&self, depth: usize) -> NetCdfResult<()> {
        if self.end() > depth {
            return Err(NetCdfError::Validation(format!(
                "layers {}..{} exceed depth dimension of {}",
                self.start,
                self.end(),
                depth
            )));
        }
        Ok(())
    }
}

/// Average `layers` consecutive rows of `n_land` values into one row.
///
/// Accumulates in f64. A single layer comes back unchanged.
pub fn depth_mean(values: &[f32], layers: usize, n_land: usize) -> Vec<f32> {
    debug_assert_eq!(values.len(), layers * n_land);
    let mut sums = vec![0.0f64; n_land];
    for row in values.chunks_exact(n_land.max(1)).take(layers) {
        for (sum, &v) in sums.iter_mut().zip(row) {
            *sum += f64::from(v);
        }
    }
    sums.into_iter().map(|s| (s / layers as f64) as f32).collect()
}

/// Read a depth-averaged variable from an uncompressed dump.
///
/// The variable's first dimension is depth; all remaining dimensions are
/// flattened into the land-point axis.
pub fn read_layer_mean<P: AsRef<Path>>(
    path: P,
    variable: &str,
    layers: LayerSelection,
) -> NetCdfResult<Vec<f32>> {
    let file = native::open(path.as_ref())?;
    let var = native::require_variable(&file, variable)?;

    let dims = native::dimension_lengths(&var);
    if dims.len() < 2 {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} must have a depth and a land-point dimension, found {} dimensions",
            variable,
            dims.len()
        )));
    }
    let depth = dims[0];
    let n_land: usize = dims[1..].iter().product();
    layers.check(depth)?;

    let raw = native::read_slab_f64(&var, native::leading_slab(layers.start..layers.end(), dims.len() - 1))?;
    if raw.len() != layers.count * n_land {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} returned {} values, expected {}",
            variable,
            raw.len(),
            layers.count * n_land
        )));
    }

    let values = native::fill_to_nan(&raw, native::fill_value(&var));
    Ok(depth_mean(&values, layers.count, n_land))
}

/// Loads one year of depth-averaged land-point data per call.
#[derive(Debug, Clone)]
pub struct YearlyLoader {
    data_dir: PathBuf,
    template: FileTemplate,
}

impl YearlyLoader {
    pub fn new(data_dir: impl Into<PathBuf>, template: FileTemplate) -> Self {
        Self {
            data_dir: data_dir.into(),
            template,
        }
    }

    /// Uncompressed path of the dump for one model year.
    pub fn path_for(&self, model_id: &str, year: i32) -> PathBuf {
        self.data_dir.join(self.template.resolve(model_id, year))
    }

    /// Read `variable` for one model year, averaged over
    /// `[layer_start, layer_start + layer_count)`.
    ///
    /// The archive is decompressed for the read and recompressed afterwards
    /// on every path. If the read succeeds but recompression fails, the
    /// recompression error is returned. If both fail, the recompression error
    /// is logged and the read error returned.
    pub fn load_year(
        &self,
        model_id: &str,
        year: i32,
        variable: &str,
        layer_start: usize,
        layer_count: usize,
    ) -> NetCdfResult<Vec<f32>> {
        let layers = LayerSelection::new(layer_start, layer_count)?;
        let path = self.path_for(model_id, year);

        let guard = DecompressedFile::acquire(&path)?;
        info!(path = %guard.path().display(), year = year, "Reading data");
        let read = read_layer_mean(guard.path(), variable, layers);
        let restored = guard.restore();

        settle_read(&path, read, restored)
    }
}

/// Combine the outcome of a read with the outcome of recompressing its file.
///
/// A failed recompression after a good read is the error. After a failed
/// read the read error wins and the recompression failure is logged.
fn settle_read<T>(
    path: &Path,
    read: NetCdfResult<T>,
    restored: NetCdfResult<()>,
) -> NetCdfResult<T> {
    match (read, restored) {
        (Ok(values), Ok(())) => Ok(values),
        (Ok(_), Err(cleanup)) => Err(cleanup),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup)) => {
            error!(
                path = %path.display(),
                error = %cleanup,
                "Recompression failed after read error; file left uncompressed"
            );
            Err(e)
        }
    }
}
