//! One plotting run for one model.
//!
//! ```text
//! catalog.select(index)
//!      │
//!      ├─► load_grid_info(grid_file)
//!      │
//!      ├─► for year in start..=end: load_year ─► StackedSeries::push
//!      │
//!      ├─► aggregate ─► remap(mean), remap(growth)
//!      │
//!      └─► render 3 plots in memory ─► write_plots(output_dir)
//! ```

use std::path::PathBuf;

use climate_common::{Catalog, ClimateResult, GridInfo};
use grid_processor::{remap, Reductions, StackedSeries};
use netcdf_parser::{load_grid_info, YearlyLoader};
use renderer::{
    check_output_dir, render_map, render_timeseries, write_plots, ColorRamp, EncodedPlot,
    MapStyle, PlotNames, SeriesLabels, SeriesStyle, StyleConfig, TextRenderer,
};
use tracing::{debug, info, warn};

use crate::config::{PlotSettings, PlotterConfig};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub model_id: String,
    pub years: usize,
    pub land_points: usize,
    pub outputs: Vec<PathBuf>,
}

/// Font, color ramp and colorbar ticks resolved from the plot settings.
#[derive(Debug)]
pub struct PlotAssets {
    pub text: Option<TextRenderer>,
    pub ramp: ColorRamp,
    pub ticks: u32,
}

impl PlotAssets {
    pub fn load(settings: &PlotSettings) -> ClimateResult<Self> {
        let text = match &settings.font {
            Some(path) => Some(TextRenderer::load(path)?),
            None => {
                warn!("No font configured; plot titles and labels are omitted");
                None
            }
        };
        let (ramp, ticks) = match &settings.style_file {
            Some(path) => {
                let styles = StyleConfig::from_file(path)?;
                let style = styles.require_style(&settings.style_name)?;
                (style.ramp()?, style.tick_count())
            }
            None => (ColorRamp::viridis(), MapStyle::default().ticks),
        };
        Ok(Self { text, ramp, ticks })
    }
}

/// Run the whole pipeline for the model at 1-based `gcm_index`.
pub fn run(config: &PlotterConfig, catalog: &Catalog, gcm_index: usize) -> ClimateResult<RunSummary> {
    let model_id = catalog.select(gcm_index)?;
    info!(gcm = %model_id, index = gcm_index, "Selected model");

    // Fail before hours of reading rather than at the end
    check_output_dir(&config.output_dir)?;
    let assets = PlotAssets::load(&config.plot)?;

    let grid_path = config.grid_path();
    let grid = load_grid_info(&grid_path, &(&config.grid_fields).into())?;

    let reductions = load_and_reduce(config, model_id)?;
    let land_points = reductions.mean.len();

    let plots = render_plots(config, model_id, &grid, &reductions, &assets)?;
    let outputs = write_plots(&config.output_dir, &plots)?;

    info!(gcm = %model_id, plots = outputs.len(), "Run complete");
    Ok(RunSummary {
        model_id: model_id.to_string(),
        years: reductions.timeseries.len(),
        land_points,
        outputs,
    })
}

/// Read every configured year for one model and reduce the stack.
pub fn load_and_reduce(config: &PlotterConfig, model_id: &str) -> ClimateResult<Reductions> {
    let loader = YearlyLoader::new(&config.data_dir, config.template());
    // Preallocation is bounded; absurd year ranges fail on the first missing dump
    let mut stack = StackedSeries::with_capacity(config.year_count().min(1024));

    for year in config.years() {
        let values = loader.load_year(
            model_id,
            year,
            &config.variable,
            config.layer_start,
            config.layer_count,
        )?;
        debug!(gcm = %model_id, year = year, land_points = values.len(), "Loaded year");
        stack.push(values)?;
    }

    info!(gcm = %model_id, years = stack.len(), "Aggregating");
    Ok(stack.aggregate()?)
}

/// Render and encode the three plots without touching the filesystem.
pub fn render_plots(
    config: &PlotterConfig,
    model_id: &str,
    grid: &GridInfo,
    reductions: &Reductions,
    assets: &PlotAssets,
) -> ClimateResult<Vec<EncodedPlot>> {
    let names = PlotNames::new(model_id, &config.variable);
    let period = format!("({}-{})", config.start_year, config.end_year);
    let mean_title = format!("{} Global Mean {}", config.variable, period);
    let growth_title = format!("{} Global Mean Growth Rate {}", config.variable, period);

    let map_style = MapStyle {
        cell_size: config.plot.cell_size,
        ramp: assets.ramp.clone(),
        ticks: assets.ticks,
        ..MapStyle::default()
    };
    let text = assets.text.as_ref();

    let mean_grid = remap(&reductions.mean, &grid.index)?;
    let mean_map = render_map(&mean_grid, &mean_title, &map_style, text)?;

    let growth_grid = remap(&reductions.growth, &grid.index)?;
    let growth_map = render_map(&growth_grid, &growth_title, &map_style, text)?;

    let years: Vec<i32> = config.years().collect();
    let labels = SeriesLabels {
        title: mean_title,
        x_label: "Year".to_string(),
        y_label: config.variable.clone(),
    };
    let series = render_timeseries(
        &years,
        &reductions.timeseries,
        &labels,
        &SeriesStyle::default(),
        text,
    )?;

    Ok(vec![
        EncodedPlot::encode(names.mean_map, &mean_map)?,
        EncodedPlot::encode(names.growth_map, &growth_map)?,
        EncodedPlot::encode(names.timeseries, &series)?,
    ])
}
