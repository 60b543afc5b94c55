//! Threshold counting and summary statistics over a series.

use serde::Serialize;

/// Readings at or above this many degrees Celsius count as hot.
pub const DEFAULT_HOT_THRESHOLD_CELSIUS: f64 = 30.0;

/// Count elements with `value >= threshold`.
///
/// NaN never satisfies the comparison, so missing readings are not counted.
pub fn count_at_or_above(values: &[f64], threshold: f64) -> usize {
    values.iter().filter(|&&v| v >= threshold).count()
}

/// One-pass summary of a converted series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    /// Number of readings, including missing ones
    pub count: usize,
    /// Number of finite readings
    pub valid: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Threshold used for `hot_count`
    pub threshold: f64,
    /// Readings at or above `threshold`
    pub hot_count: usize,
}

impl SeriesSummary {
    pub fn compute(values: &[f64], threshold: f64) -> Self {
        let mut valid = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for &v in values {
            if !v.is_finite() {
                continue;
            }
            valid += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        let (min, max, mean) = if valid > 0 {
            (Some(min), Some(max), Some(sum / valid as f64))
        } else {
            (None, None, None)
        };

        Self {
            count: values.len(),
            valid,
            min,
            max,
            mean,
            threshold,
            hot_count: count_at_or_above(values, threshold),
        }
    }
}
