//! Error types for rendering and writing plots.

use std::path::PathBuf;

use climate_common::ClimateError;
use thiserror::Error;

/// Errors that can occur while rendering, encoding or writing images.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("invalid plot input: {0}")]
    InvalidInput(String),

    #[error("invalid style: {0}")]
    Style(String),

    #[error("failed to load font {path}: {message}")]
    Font { path: PathBuf, message: String },

    #[error("output directory {path} is not usable: {message}")]
    OutputDir { path: PathBuf, message: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn output_dir(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OutputDir {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Style(err.to_string())
    }
}

impl From<RenderError> for ClimateError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidInput(_) => ClimateError::validation(err.to_string()),
            RenderError::Style(_) => ClimateError::usage(err.to_string()),
            _ => ClimateError::resource(err.to_string()),
        }
    }
}

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;
