//! Shared test utilities for the soil-plotter workspace.
//!
//! This crate provides common testing infrastructure:
//! - NetCDF fixture writers for grid metadata and yearly dumps
//! - A model directory builder laying out gzip-archived yearly dumps
//! - Synthetic land-point value generators
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Result type for fixture writers.
pub type FixtureResult<T> = Result<T, Box<dyn std::error::Error>>;
