//! Rendering errors.

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to plot: series is empty")]
    Empty,

    #[error("Label/value length mismatch: {labels} labels, {values} values")]
    LengthMismatch { labels: usize, values: usize },

    #[error("Nothing to plot: series has no finite values")]
    NoFiniteValues,

    #[error("Invalid chart size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to load font")]
    Font,

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}
