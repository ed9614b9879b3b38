//! Reductions and remapping for land-point model output.
//!
//! Yearly dumps hold one value per land point. This crate turns a stack of
//! those arrays into the per-point mean and growth rate plus a yearly
//! spatial-mean series, and scatters land-point arrays back onto the regular
//! lat/lon grid for plotting.
//!
//! ```text
//! year 0 ─┐
//! year 1 ─┼─► StackedSeries::aggregate() ─► mean, growth, timeseries
//!   ...   ─┘                                  │
//!                                             ▼
//!                          remap(mean, land_index) ─► MaskedGrid
//! ```

pub mod aggregate;
pub mod error;
pub mod remap;

pub use aggregate::{aggregate, Reductions, StackedSeries};
pub use error::{GridError, Result};
pub use remap::{remap, remap_with_mask};
