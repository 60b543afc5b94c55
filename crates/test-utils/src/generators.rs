//! Generators for synthetic ERA5-like data.
//!
//! Values follow simple closed-form patterns so tests can compute the
//! expected value at any grid position.

use era5_common::Grid;

/// 2023-05-27T00:00:00Z, the first time step of the reference ERA5 day.
pub const ERA5_DAY_START: i64 = 1_685_145_600;

/// Hourly epoch-second axis starting at `start`.
pub fn hourly_axis(start: i64, steps: usize) -> Vec<i64> {
    (0..steps as i64).map(|h| start + h * 3600).collect()
}

/// Kelvin value used by [`era5_like_grid`] at a given position.
///
/// A diurnal cycle peaking at 14 UTC, cooling northward and warming eastward.
pub fn synthetic_kelvin(time_index: usize, lat_index: usize, lon_index: usize) -> f64 {
    let hour = (time_index % 24) as f64;
    let diurnal = 6.0 * (std::f64::consts::PI * (hour - 8.0) / 12.0).sin();
    295.0 + diurnal - 0.05 * lat_index as f64 + 0.1 * lon_index as f64
}

/// Flat row-major values for an `n_time x n_lat x n_lon` grid.
pub fn synthetic_values(n_time: usize, n_lat: usize, n_lon: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(n_time * n_lat * n_lon);
    for t in 0..n_time {
        for lat in 0..n_lat {
            for lon in 0..n_lon {
                data.push(synthetic_kelvin(t, lat, lon));
            }
        }
    }
    data
}

/// Latitudes descending from 48.25° in 0.25° steps, as ERA5 orders them.
pub fn era5_latitudes(n_lat: usize) -> Vec<f64> {
    (0..n_lat).map(|i| 48.25 - 0.25 * i as f64).collect()
}

/// Longitudes ascending from 0° in 0.25° steps.
pub fn era5_longitudes(n_lon: usize) -> Vec<f64> {
    (0..n_lon).map(|i| 0.25 * i as f64).collect()
}

/// A grid shaped like the reference ERA5 subset, filled with
/// [`synthetic_kelvin`] values.
pub fn era5_like_grid(n_time: usize, n_lat: usize, n_lon: usize) -> Grid {
    Grid::new(
        hourly_axis(ERA5_DAY_START, n_time),
        era5_latitudes(n_lat),
        era5_longitudes(n_lon),
        synthetic_values(n_time, n_lat, n_lon),
    )
    .expect("synthetic grid dimensions are consistent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hourly_axis() {
        let axis = hourly_axis(0, 3);
        assert_eq!(axis, vec![0, 3600, 7200]);
    }

    #[test]
    fn test_grid_matches_generator() {
        let grid = era5_like_grid(3, 4, 5);
        assert_eq!(grid.value_at(2, 3, 4), Some(synthetic_kelvin(2, 3, 4)));
        assert_eq!(grid.latitude()[0], 48.25);
        assert_eq!(grid.longitude()[4], 1.0);
    }
}
