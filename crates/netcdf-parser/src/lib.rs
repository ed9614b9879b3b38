//! NetCDF readers for JULES land-point model output.
//!
//! Two kinds of file are read:
//!
//! - the grid metadata file (`grid_info.nc`), loaded once per run, mapping
//!   land points onto the regular lat/lon grid ([`load_grid_info`]);
//! - yearly dumps, archived gzip-compressed, each holding a multi-layer
//!   variable over the land-point axis ([`YearlyLoader::load_year`]).
//!
//! # System requirements
//!
//! Reading goes through the `netcdf` crate, which links libnetcdf and HDF5
//! (`libhdf5-dev libnetcdf-dev`). Call [`silence_hdf5_errors`] once at startup
//! to keep HDF5 diagnostics off stderr.

pub mod error;
pub mod grid_info;
pub mod gzip;
pub mod native;
pub mod yearly;

pub use error::{NetCdfError, NetCdfResult};
pub use grid_info::{load_grid_info, GridFieldNames};
pub use gzip::{compressed_path, compression_state, CompressionState, DecompressedFile};
pub use native::silence_hdf5_errors;
pub use yearly::{
    depth_mean, read_layer_mean, FileTemplate, LayerSelection, YearlyLoader, GCM_PLACEHOLDER,
    YEAR_PLACEHOLDER,
};
