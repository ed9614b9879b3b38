//! Image rendering for gridded model output.
//!
//! Implements the plot types needed for one model run:
//! - Gradient maps of a masked grid with a colorbar
//! - Line plots of a yearly series
//! - PNG encoding (indexed or RGBA) and writing

pub mod error;
pub mod gradient;
pub mod map;
pub mod output;
pub mod png;
pub mod style;
pub mod text;
pub mod timeseries;

pub use error::{RenderError, Result};
pub use gradient::{Color, ColorRamp};
pub use map::{render_map, MapStyle};
pub use output::{check_output_dir, write_plots, EncodedPlot, PlotNames};
pub use style::StyleConfig;
pub use text::TextRenderer;
pub use timeseries::{render_timeseries, SeriesLabels, SeriesStyle};
