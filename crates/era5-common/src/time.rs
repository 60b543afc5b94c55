//! Time handling for epoch-second time axes.

use chrono::{DateTime, Utc};

use crate::error::{AnalysisError, AnalysisResult};

/// Convert epoch seconds to a UTC instant.
pub fn to_datetime(epoch_seconds: i64) -> AnalysisResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(epoch_seconds, 0)
        .ok_or(AnalysisError::InvalidTimestamp(epoch_seconds))
}

/// Format epoch seconds as zero-padded 24-hour `HH:MM:SS` in UTC.
pub fn format_time(epoch_seconds: i64) -> AnalysisResult<String> {
    Ok(to_datetime(epoch_seconds)?.format("%H:%M:%S").to_string())
}

/// Format a whole time axis, preserving order.
pub fn format_timeline(epoch_seconds: &[i64]) -> AnalysisResult<Vec<String>> {
    epoch_seconds.iter().map(|&t| format_time(t)).collect()
}

/// Format the calendar day of an instant as `DD.MM.YYYY`.
pub fn format_date(epoch_seconds: i64) -> AnalysisResult<String> {
    Ok(to_datetime(epoch_seconds)?.format("%d.%m.%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_format_timeline() {
        let labels = format_timeline(&[1685145600, 1685149200]).unwrap();
        assert_eq!(labels, vec!["00:00:00", "01:00:00"]);
    }

    #[test]
    fn test_format_matches_decomposition() {
        for e in [0i64, 59, 3599, 86399, 1685187000, -1] {
            let dt = to_datetime(e).unwrap();
            let expected = format!("{:02}:{:02}:{:02}", dt.hour(), dt.minute(), dt.second());
            assert_eq!(format_time(e).unwrap(), expected);
        }
        assert_eq!(format_time(-1).unwrap(), "23:59:59");
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = format_time(i64::MAX).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidTimestamp(i64::MAX)));
        assert!(format_timeline(&[0, i64::MIN]).is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(1685145600).unwrap(), "27.05.2023");
    }
}
