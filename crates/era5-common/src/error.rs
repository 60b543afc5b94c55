//! Error types for point analysis.

use std::fmt;

use thiserror::Error;

/// Result type alias using AnalysisError.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Grid axis, used to report which index was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Time,
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Time => "time",
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        };
        f.write_str(name)
    }
}

/// Failure classes of the analysis pipeline. All of them are terminal.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input file missing or unreadable
    #[error("Input file not accessible: {0}")]
    FileNotAccessible(String),

    /// Expected variable/coordinate absent or of the wrong shape
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Index {index} out of range for {axis} axis of size {size}")]
    IndexOutOfRange { axis: Axis, index: usize, size: usize },

    #[error("Invalid timestamp: {0} is not a representable UTC instant")]
    InvalidTimestamp(i64),
}

impl AnalysisError {
    /// Short machine-readable name, used in JSON reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::FileNotAccessible(_) => "FileNotAccessible",
            AnalysisError::SchemaMismatch(_) => "SchemaMismatch",
            AnalysisError::IndexOutOfRange { .. } => "IndexOutOfRange",
            AnalysisError::InvalidTimestamp(_) => "InvalidTimestamp",
        }
    }
}
