//! Soil temperature plotter.
//!
//! For one GCM-driven land-surface run, reads the yearly soil temperature
//! dumps, computes the per-point mean and growth rate plus the global-mean
//! time series, and writes three PNG plots.

pub mod config;
pub mod pipeline;

pub use config::{ConfigError, PlotterConfig};
pub use pipeline::{run, RunSummary};
