//! Single-point 2 m temperature report for one-day ERA5 files.
//!
//! Loads a `(time, latitude, longitude)` temperature variable, extracts the
//! series at one grid point, converts it to °C, counts hot readings and
//! renders a time-series chart.

pub mod config;
pub mod pipeline;
pub mod report;

pub use config::{AnalysisConfig, ConfigOverrides};
pub use pipeline::{analyze_grid, run, PipelineError, PointAnalysis};
pub use report::AnalysisReport;
