//! Chart rendering for point time series.
//!
//! - `chart`: line-and-marker charts with rotated time labels
//! - `png`: RGBA PNG encoding

pub mod chart;
pub mod error;
pub mod png;

pub use chart::{render_line_chart, render_line_chart_png, ChartData, ChartLayout, ChartStyle};
pub use error::{RenderError, RenderResult};
