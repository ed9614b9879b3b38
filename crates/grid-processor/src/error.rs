//! Error types for grid processing.

use climate_common::ClimateError;
use thiserror::Error;

/// Errors that can occur while reducing or remapping land-point data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Fewer years than a reduction needs.
    #[error("need at least {needed} years to aggregate, got {got}")]
    InsufficientYears { needed: usize, got: usize },

    /// A yearly array with no land points.
    #[error("year {year} has no land points")]
    EmptyYear { year: usize },

    /// A yearly array whose length differs from the first year's.
    #[error("year {year} has {got} land points, expected {expected}")]
    LengthMismatch {
        year: usize,
        got: usize,
        expected: usize,
    },

    /// A valid grid cell pointing outside the land-point array.
    #[error("cell ({row}, {col}) references land point {index}, but only {len} are available")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        index: i64,
        len: usize,
    },

    /// Inconsistent grid shapes.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

impl GridError {
    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }
}

impl From<ClimateError> for GridError {
    fn from(err: ClimateError) -> Self {
        Self::InvalidGrid(err.to_string())
    }
}

impl From<GridError> for ClimateError {
    fn from(err: GridError) -> Self {
        ClimateError::validation(err.to_string())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridError>;
