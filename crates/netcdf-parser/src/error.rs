//! Error types for NetCDF reading operations.

use std::path::PathBuf;

use climate_common::ClimateError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Neither the compressed nor the plain file exists
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// gunzip step failed
    #[error("Decompression failed for {path}: {message}")]
    Decompression { path: PathBuf, message: String },

    /// gzip step failed
    #[error("Recompression failed for {path}: {message}")]
    Compression { path: PathBuf, message: String },

    /// Data read fine but does not fit the requested selection or grid
    #[error("Invalid selection: {0}")]
    Validation(String),
}

impl From<NetCdfError> for ClimateError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::Validation(msg) => ClimateError::Validation(msg),
            other => ClimateError::Resource(other.to_string()),
        }
    }
}

impl From<ClimateError> for NetCdfError {
    fn from(err: ClimateError) -> Self {
        match err {
            ClimateError::Validation(msg) => NetCdfError::Validation(msg),
            other => NetCdfError::InvalidFormat(other.to_string()),
        }
    }
}
