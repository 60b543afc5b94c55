//! The analysis pipeline: load, extract, convert, count, format, render.

use std::fs;
use std::path::PathBuf;

use era5_common::{
    format_date, format_timeline, AnalysisError, Grid, GridShape, PointSeries, SeriesSummary,
    UnitTransform,
};
use netcdf_parser::load_grid;
use renderer::{render_line_chart_png, ChartData, ChartStyle, RenderError};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::report::AnalysisReport;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Chart rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to write chart to {path}: {source}")]
    ChartWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of analysing one point of an in-memory grid.
#[derive(Debug, Clone)]
pub struct PointAnalysis {
    pub shape: GridShape,
    /// Series converted to °C
    pub series: PointSeries,
    /// `HH:MM:SS` label per time step
    pub labels: Vec<String>,
    pub summary: SeriesSummary,
    pub title: String,
}

/// Run every step that does not touch the filesystem.
///
/// `units` is the data variable's `units` attribute; anything other than a
/// Kelvin or Celsius temperature is rejected.
pub fn analyze_grid(
    grid: &Grid,
    units: Option<&str>,
    config: &AnalysisConfig,
) -> Result<PointAnalysis, AnalysisError> {
    let transform = UnitTransform::celsius_from(units).ok_or_else(|| {
        AnalysisError::SchemaMismatch(format!(
            "variable '{}' has units '{}', expected a temperature",
            config.variables.data,
            units.unwrap_or_default()
        ))
    })?;

    let location = config.location;
    let raw = grid.extract_point(location.lon_index, location.lat_index)?;
    debug!(
        lat_index = location.lat_index,
        lon_index = location.lon_index,
        latitude = raw.latitude(),
        longitude = raw.longitude(),
        steps = raw.len(),
        "Extracted point series"
    );

    let series = raw.convert(transform);
    let summary = SeriesSummary::compute(series.values(), config.hot_threshold_celsius);
    let labels = format_timeline(series.time())?;
    let title = chart_title(&series)?;

    Ok(PointAnalysis {
        shape: grid.shape(),
        series,
        labels,
        summary,
        title,
    })
}

/// `Temperature on DD.MM.YYYY at longitude X° and latitude Y°`, dated by the
/// first time step.
pub fn chart_title(series: &PointSeries) -> Result<String, AnalysisError> {
    let location = format!(
        "at longitude {}° and latitude {}°",
        series.longitude(),
        series.latitude()
    );
    match series.time().first() {
        Some(&first) => Ok(format!("Temperature on {} {}", format_date(first)?, location)),
        None => Ok(format!("Temperature {}", location)),
    }
}

/// Render the chart for an analysis and write it as PNG.
pub fn write_chart(analysis: &PointAnalysis, config: &AnalysisConfig) -> Result<PathBuf, PipelineError> {
    let style = ChartStyle {
        width: config.chart.width,
        height: config.chart.height,
        ..ChartStyle::default()
    };
    let data = ChartData::new(
        analysis.title.clone(),
        analysis.labels.clone(),
        analysis.series.values().to_vec(),
    );
    let png = render_line_chart_png(&data, &style)?;

    let path = config.chart.output_path.clone();
    fs::write(&path, &png).map_err(|source| PipelineError::ChartWrite {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = png.len(), "Chart written");
    Ok(path)
}

/// Full run: load the configured file, analyse, and optionally render.
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport, PipelineError> {
    let input = config.resolved_input_path();
    info!(input = %input.display(), variable = %config.variables.data, "Starting analysis");

    let loaded = load_grid(&input, &config.variables).map_err(AnalysisError::from)?;
    let analysis = analyze_grid(&loaded.grid, loaded.units.as_deref(), config)?;
    info!(
        hot_count = analysis.summary.hot_count,
        threshold = config.hot_threshold_celsius,
        "Counted hot readings"
    );

    let chart_path = if config.chart.enabled {
        Some(write_chart(&analysis, config)?)
    } else {
        None
    };

    Ok(AnalysisReport::new(
        &input,
        &config.variables.data,
        &analysis,
        chart_path,
    ))
}
