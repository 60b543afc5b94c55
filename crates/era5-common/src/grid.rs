//! Gridded time × latitude × longitude data and point extraction.

use serde::Serialize;
use std::fmt;

use crate::error::{AnalysisError, AnalysisResult, Axis};
use crate::units::UnitTransform;

/// Sizes of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    /// Number of time steps
    pub n_time: usize,
    /// Number of latitude steps
    pub n_lat: usize,
    /// Number of longitude steps
    pub n_lon: usize,
}

impl GridShape {
    pub fn new(n_time: usize, n_lat: usize, n_lon: usize) -> Self {
        Self { n_time, n_lat, n_lon }
    }

    /// Total number of values in the grid.
    pub fn len(&self) -> usize {
        self.n_time * self.n_lat * self.n_lon
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.n_time, self.n_lat, self.n_lon)
    }
}

/// A 3-D variable `T[time, lat, lon]` with its coordinate axes.
///
/// Values are stored flat in row-major order (longitude varies fastest),
/// which is the layout netCDF hands back for a `(time, latitude, longitude)`
/// variable.
#[derive(Debug, Clone)]
pub struct Grid {
    time: Vec<i64>,
    latitude: Vec<f64>,
    longitude: Vec<f64>,
    values: Vec<f64>,
}

impl Grid {
    /// Build a grid, checking that the data length matches the axes.
    ///
    /// The time axis must be strictly ascending.
    pub fn new(
        time: Vec<i64>,
        latitude: Vec<f64>,
        longitude: Vec<f64>,
        values: Vec<f64>,
    ) -> AnalysisResult<Self> {
        let expected = time.len() * latitude.len() * longitude.len();
        if values.len() != expected {
            return Err(AnalysisError::SchemaMismatch(format!(
                "data has {} values but axes are {} x {} x {} ({} values)",
                values.len(),
                time.len(),
                latitude.len(),
                longitude.len(),
                expected
            )));
        }

        if let Some(pos) = time.windows(2).position(|w| w[0] >= w[1]) {
            return Err(AnalysisError::SchemaMismatch(format!(
                "time axis is not ascending at index {}",
                pos + 1
            )));
        }

        Ok(Self {
            time,
            latitude,
            longitude,
            values,
        })
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.time.len(), self.latitude.len(), self.longitude.len())
    }

    /// Time axis in epoch seconds.
    pub fn time(&self) -> &[i64] {
        &self.time
    }

    /// Latitude axis in degrees.
    pub fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    /// Longitude axis in degrees.
    pub fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    /// Raw value at a grid position, or None when any index is out of bounds.
    pub fn value_at(&self, time_index: usize, lat_index: usize, lon_index: usize) -> Option<f64> {
        if time_index >= self.time.len()
            || lat_index >= self.latitude.len()
            || lon_index >= self.longitude.len()
        {
            return None;
        }
        self.values.get(self.flat_index(time_index, lat_index, lon_index)).copied()
    }

    fn flat_index(&self, time_index: usize, lat_index: usize, lon_index: usize) -> usize {
        let n_lat = self.latitude.len();
        let n_lon = self.longitude.len();
        (time_index * n_lat + lat_index) * n_lon + lon_index
    }

    /// Slice the time series at a fixed (lat, lon) position.
    ///
    /// Values are returned in the grid's own units, ordered by time.
    pub fn extract_point(&self, lon_index: usize, lat_index: usize) -> AnalysisResult<PointSeries> {
        check_index(Axis::Longitude, lon_index, self.longitude.len())?;
        check_index(Axis::Latitude, lat_index, self.latitude.len())?;

        let values = (0..self.time.len())
            .map(|t| self.values[self.flat_index(t, lat_index, lon_index)])
            .collect();

        Ok(PointSeries {
            lat_index,
            lon_index,
            latitude: self.latitude[lat_index],
            longitude: self.longitude[lon_index],
            time: self.time.clone(),
            values,
        })
    }
}

fn check_index(axis: Axis, index: usize, size: usize) -> AnalysisResult<()> {
    if index >= size {
        return Err(AnalysisError::IndexOutOfRange { axis, index, size });
    }
    Ok(())
}

/// Free-function form of [`Grid::extract_point`].
pub fn extract_point(lon_index: usize, lat_index: usize, grid: &Grid) -> AnalysisResult<PointSeries> {
    grid.extract_point(lon_index, lat_index)
}

/// A time series at one grid location.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    lat_index: usize,
    lon_index: usize,
    latitude: f64,
    longitude: f64,
    time: Vec<i64>,
    values: Vec<f64>,
}

impl PointSeries {
    pub fn lat_index(&self) -> usize {
        self.lat_index
    }

    pub fn lon_index(&self) -> usize {
        self.lon_index
    }

    /// Latitude of the location in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude of the location in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Epoch seconds, one per value.
    pub fn time(&self) -> &[i64] {
        &self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply a unit transform, producing a new series at the same location.
    pub fn convert(&self, transform: UnitTransform) -> PointSeries {
        PointSeries {
            values: transform.apply_all(&self.values),
            time: self.time.clone(),
            ..*self
        }
    }
}
