//! Error types for NetCDF parsing operations.

use era5_common::AnalysisError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File missing, unreadable, or not a netCDF file
    #[error("Cannot open {path}: {reason}")]
    FileNotAccessible { path: String, reason: String },

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Variable present but with unexpected dimensions or sizes
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Time coordinate value with no representable epoch-seconds instant
    #[error("Time value {0} is not a representable timestamp")]
    InvalidTimestamp(f64),
}

impl From<NetCdfError> for AnalysisError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::IoError(e) => AnalysisError::FileNotAccessible(e.to_string()),
            e @ NetCdfError::FileNotAccessible { .. } => {
                AnalysisError::FileNotAccessible(e.to_string())
            }
            NetCdfError::MissingData(what) => {
                AnalysisError::SchemaMismatch(format!("missing {}", what))
            }
            NetCdfError::SchemaMismatch(msg) | NetCdfError::InvalidFormat(msg) => {
                AnalysisError::SchemaMismatch(msg)
            }
            // saturating cast, NaN becomes 0
            NetCdfError::InvalidTimestamp(value) => AnalysisError::InvalidTimestamp(value as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err: AnalysisError = NetCdfError::FileNotAccessible {
            path: "x.nc".to_string(),
            reason: "not found".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "FileNotAccessible");

        let err: AnalysisError = NetCdfError::MissingData("variable t2m".to_string()).into();
        assert_eq!(err.kind(), "SchemaMismatch");

        let err: AnalysisError = NetCdfError::InvalidTimestamp(2e17).into();
        assert!(matches!(err, AnalysisError::InvalidTimestamp(200_000_000_000_000_000)));
    }
}
