//! Encoding and writing of finished plots.
//!
//! Plots are encoded in memory first and only written once the output
//! directory has been checked, so a failed run leaves no partial set behind.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::info;

use crate::error::{RenderError, Result};
use crate::png::encode_image;

/// File names of the three plots produced for one model and variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotNames {
    pub mean_map: String,
    pub growth_map: String,
    pub timeseries: String,
}

impl PlotNames {
    pub fn new(model_id: &str, variable: &str) -> Self {
        Self {
            mean_map: format!("{}_Global_Mean_{}_Map.png", model_id, variable),
            growth_map: format!("{}_Global_MeanGrowth_{}_Map.png", model_id, variable),
            timeseries: format!("{}_Global_Mean_{}_Timeseries.png", model_id, variable),
        }
    }
}

/// A plot encoded as PNG, ready to write.
#[derive(Debug, Clone)]
pub struct EncodedPlot {
    pub file_name: String,
    pub png: Vec<u8>,
}

impl EncodedPlot {
    pub fn encode(file_name: impl Into<String>, image: &RgbaImage) -> Result<Self> {
        Ok(Self {
            file_name: file_name.into(),
            png: encode_image(image)?,
        })
    }
}

/// Check that `dir` exists, is a directory and is not read-only.
///
/// The directory is never created.
pub fn check_output_dir(dir: &Path) -> Result<()> {
    let meta = fs::metadata(dir).map_err(|e| RenderError::output_dir(dir, e.to_string()))?;
    if !meta.is_dir() {
        return Err(RenderError::output_dir(dir, "not a directory"));
    }
    if meta.permissions().readonly() {
        return Err(RenderError::output_dir(dir, "directory is read-only"));
    }
    Ok(())
}

/// Write every plot into `dir`, returning the written paths.
pub fn write_plots(dir: &Path, plots: &[EncodedPlot]) -> Result<Vec<PathBuf>> {
    check_output_dir(dir)?;

    let mut written = Vec::with_capacity(plots.len());
    for plot in plots {
        let path = dir.join(&plot.file_name);
        fs::write(&path, &plot.png).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = plot.png.len(), "Saved plot");
        written.push(path);
    }
    Ok(written)
}
