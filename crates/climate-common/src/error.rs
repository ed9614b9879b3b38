//! Error taxonomy for the plotting pipeline.
//!
//! Every failure in a run is fatal and falls into one of three classes:
//! operator mistakes ([`ClimateError::Usage`]), I/O and file-format problems
//! ([`ClimateError::Resource`]) and data-integrity problems between the grid
//! metadata and the yearly data ([`ClimateError::Validation`]). Library crates
//! keep their own error enums and convert into this one at the pipeline edge.

use thiserror::Error;

/// Result type alias using ClimateError.
pub type ClimateResult<T> = Result<T, ClimateError>;

/// Primary error type for a plotting run.
#[derive(Debug, Error)]
pub enum ClimateError {
    /// Bad catalog index, bad arguments or bad configuration values.
    #[error("Usage error: {0}")]
    Usage(String),

    /// Missing or unreadable files, failed (de)compression, missing named
    /// fields, unwritable output.
    #[error("Resource error: {0}")]
    Resource(String),

    /// Shape mismatches, out-of-range indices, insufficient years.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ClimateError {
    pub fn usage(msg: impl Into<String>) -> Self {
        ClimateError::Usage(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        ClimateError::Resource(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ClimateError::Validation(msg.into())
    }

    /// Short class name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ClimateError::Usage(_) => "usage",
            ClimateError::Resource(_) => "resource",
            ClimateError::Validation(_) => "validation",
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClimateError::Usage(_) => 2,
            ClimateError::Resource(_) => 3,
            ClimateError::Validation(_) => 4,
        }
    }
}

impl From<std::io::Error> for ClimateError {
    fn from(err: std::io::Error) -> Self {
        ClimateError::Resource(err.to_string())
    }
}
