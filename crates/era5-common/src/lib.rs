//! Common types and operations for single-point ERA5 analysis.
//!
//! The grid model, point extraction, unit conversion, threshold statistics
//! and time formatting live here so that the netCDF loader, the renderer
//! and the report service all agree on one set of types.

pub mod error;
pub mod grid;
pub mod stats;
pub mod time;
pub mod units;

pub use error::{AnalysisError, AnalysisResult, Axis};
pub use grid::{extract_point, Grid, GridShape, PointSeries};
pub use stats::{count_at_or_above, SeriesSummary, DEFAULT_HOT_THRESHOLD_CELSIUS};
pub use time::{format_date, format_time, format_timeline};
pub use units::{kelvin_to_celsius, UnitTransform, KELVIN_OFFSET};
