//! ERA5 point temperature report.
//!
//! Prints grid axis sizes and the number of hot hourly readings at one
//! location, and writes a time-series chart of the day.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use point_report::{run, AnalysisConfig, ConfigOverrides};

#[derive(Parser, Debug)]
#[command(name = "point-report")]
#[command(about = "Hourly 2 m temperature at one ERA5 grid point")]
struct Args {
    /// YAML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// netCDF input file
    #[arg(short, long, env = "ERA5_FILE")]
    input: Option<PathBuf>,

    /// Zero-based latitude index
    #[arg(long, env = "ERA5_LAT_INDEX")]
    lat_index: Option<usize>,

    /// Zero-based longitude index
    #[arg(long, env = "ERA5_LON_INDEX")]
    lon_index: Option<usize>,

    /// Hot threshold in °C (readings >= threshold are counted)
    #[arg(long, env = "ERA5_HOT_THRESHOLD")]
    threshold: Option<f64>,

    /// Output path for the PNG chart
    #[arg(long, env = "ERA5_CHART_PATH")]
    chart: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_chart: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.log_json)?;
    netcdf_parser::silence_hdf5_errors();

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_yaml(path)?,
        None => AnalysisConfig::default(),
    };
    config.apply(ConfigOverrides {
        input_path: args.input,
        lat_index: args.lat_index,
        lon_index: args.lon_index,
        hot_threshold_celsius: args.threshold,
        chart_path: args.chart,
        no_chart: args.no_chart,
    });
    config.validate()?;
    info!(config = ?config, "Loaded configuration");

    let report = match run(&config) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Analysis failed");
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries the report
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
