//! CF-convention time units (`"<unit> since <reference>"`).
//!
//! CDS downloads in the current format store `valid_time` as seconds since
//! 1970, while older ERA5 files use `hours since 1900-01-01 00:00:00.0`.
//! Both are normalised to epoch seconds.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{NetCdfError, NetCdfResult};

/// Parsed `units` attribute of a time coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    /// Length of one stored unit in seconds
    pub seconds_per_unit: f64,
    /// Reference instant in epoch seconds
    pub reference_epoch: i64,
}

impl TimeUnits {
    /// Plain epoch seconds, used when no `units` attribute is present.
    pub const EPOCH_SECONDS: TimeUnits = TimeUnits {
        seconds_per_unit: 1.0,
        reference_epoch: 0,
    };

    pub fn parse(units: &str) -> NetCdfResult<Self> {
        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| NetCdfError::InvalidFormat(format!("time units '{}'", units)))?;

        let seconds_per_unit = match unit.trim().to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "s" => 1.0,
            "minutes" | "minute" | "mins" => 60.0,
            "hours" | "hour" | "hrs" | "h" => 3600.0,
            "days" | "day" | "d" => 86400.0,
            other => {
                return Err(NetCdfError::InvalidFormat(format!(
                    "unsupported time unit '{}'",
                    other
                )))
            }
        };

        let reference = parse_reference(reference).ok_or_else(|| {
            NetCdfError::InvalidFormat(format!("time reference '{}'", reference.trim()))
        })?;

        Ok(Self {
            seconds_per_unit,
            reference_epoch: reference.and_utc().timestamp(),
        })
    }

    /// Convert a stored value to epoch seconds, rounding to the nearest second.
    pub fn to_epoch_seconds(&self, value: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        let offset = (value * self.seconds_per_unit).round();
        if offset.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        self.reference_epoch.checked_add(offset as i64)
    }
}

fn parse_reference(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_end_matches("UTC").trim_end_matches('Z').trim();

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_since_epoch() {
        let units = TimeUnits::parse("seconds since 1970-01-01").unwrap();
        assert_eq!(units, TimeUnits::EPOCH_SECONDS);
        assert_eq!(units.to_epoch_seconds(1685145600.0), Some(1685145600));
    }

    #[test]
    fn test_hours_since_1900() {
        let units = TimeUnits::parse("hours since 1900-01-01 00:00:00.0").unwrap();
        // 2023-05-27T00:00:00Z
        assert_eq!(units.to_epoch_seconds(1_081_704.0), Some(1_685_145_600));
    }

    #[test]
    fn test_iso_reference_with_zone() {
        let units = TimeUnits::parse("days since 2000-01-01T12:00:00Z").unwrap();
        assert_eq!(units.reference_epoch, 946_728_000);
        assert_eq!(units.to_epoch_seconds(1.0), Some(946_814_400));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(TimeUnits::parse("fortnights since 1970-01-01").is_err());
        assert!(TimeUnits::parse("seconds").is_err());
        assert!(TimeUnits::parse("seconds since yesterday").is_err());
        assert_eq!(TimeUnits::EPOCH_SECONDS.to_epoch_seconds(f64::NAN), None);
    }
}
