//! Common types shared across the GCM plotting workspace.

pub mod catalog;
pub mod error;
pub mod grid;

pub use catalog::{Catalog, CatalogError, DEFAULT_GCMS};
pub use error::{ClimateError, ClimateResult};
pub use grid::{GridInfo, GridShape, LandIndexGrid, MaskedGrid};
