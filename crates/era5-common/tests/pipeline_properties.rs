//! Scenario tests across grid, units, stats and time.

use era5_common::{
    count_at_or_above, extract_point, format_timeline, AnalysisError, Axis, Grid, UnitTransform,
    DEFAULT_HOT_THRESHOLD_CELSIUS,
};
use test_utils::{era5_like_grid, hourly_axis, ERA5_DAY_START};

#[test]
fn test_three_hot_hours_in_a_day() {
    let mut kelvin = vec![295.0; 24];
    kelvin[12] = 303.16;
    kelvin[13] = 305.0;
    kelvin[14] = 304.2;
    kelvin[15] = 303.1;

    let celsius = UnitTransform::KelvinToCelsius.apply_all(&kelvin);
    assert_eq!(count_at_or_above(&celsius, DEFAULT_HOT_THRESHOLD_CELSIUS), 3);
}

#[test]
fn test_era5_sized_grid_bounds() {
    let grid = era5_like_grid(24, 194, 37);
    assert_eq!(grid.shape().n_lon, 37);

    let series = extract_point(33, 2, &grid).unwrap();
    assert_eq!(series.len(), grid.time().len());

    let err = extract_point(37, 2, &grid).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::IndexOutOfRange { axis: Axis::Longitude, index: 37, size: 37 }
    ));
}

#[test]
fn test_length_invariant_for_every_location() {
    let grid = era5_like_grid(5, 4, 3);
    for lat in 0..4 {
        for lon in 0..3 {
            let series = grid.extract_point(lon, lat).unwrap();
            assert_eq!(series.len(), 5);
            let labels = format_timeline(series.time()).unwrap();
            assert_eq!(labels.len(), series.len());
        }
    }
}

#[test]
fn test_hourly_axis_labels() {
    let axis = hourly_axis(ERA5_DAY_START, 24);
    let labels = format_timeline(&axis).unwrap();
    assert_eq!(labels.first().map(String::as_str), Some("00:00:00"));
    assert_eq!(labels.last().map(String::as_str), Some("23:00:00"));
}

#[test]
fn test_summary_serializes() {
    let grid = Grid::new(vec![0, 1], vec![1.0], vec![2.0], vec![300.0, 310.0]).unwrap();
    let series = grid
        .extract_point(0, 0)
        .unwrap()
        .convert(UnitTransform::KelvinToCelsius);
    let summary = era5_common::SeriesSummary::compute(series.values(), 30.0);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["hot_count"], 1);
    assert_eq!(json["count"], 2);
}
