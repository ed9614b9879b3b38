//! Soil temperature plotter CLI.
//!
//! Usage: `soil-plotter <GCM_INDEX> [--config FILE]`, where `GCM_INDEX` is the
//! 1-based position of the model in the catalog. Exit codes: 2 usage,
//! 3 missing or unreadable resources, 4 invalid data.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;
use climate_common::ClimateResult;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use soil_plotter::{run, PlotterConfig, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "soil-plotter")]
#[command(about = "Plot global mean soil temperature, growth rate and time series for one model")]
struct Args {
    /// 1-based index of the model in the catalog
    gcm_index: usize,

    /// YAML configuration file
    #[arg(short, long, env = "SOIL_PLOTTER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("soil-plotter: {:#}", e);
        return ExitCode::FAILURE;
    }
    netcdf_parser::silence_hdf5_errors();

    match execute(&args) {
        Ok(summary) => {
            info!(
                gcm = %summary.model_id,
                years = summary.years,
                land_points = summary.land_points,
                outputs = ?summary.outputs,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Run failed");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn execute(args: &Args) -> ClimateResult<RunSummary> {
    let config = PlotterConfig::load(args.config.as_deref())?;
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        variable = %config.variable,
        start_year = config.start_year,
        end_year = config.end_year,
        "Loaded configuration"
    );

    let catalog = config.catalog();
    run(&config, &catalog, args.gcm_index)
}

fn init_tracing(args: &Args) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    let installed = if args.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
