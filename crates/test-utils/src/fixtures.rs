//! Synthetic ERA5 netCDF files for loader and pipeline tests.

use std::path::{Path, PathBuf};

use crate::generators::{era5_latitudes, era5_longitudes, hourly_axis, synthetic_values, ERA5_DAY_START};

/// Storage used for the data variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Packing {
    /// Plain 32-bit floats
    Float,
    /// 16-bit integers with `scale_factor`/`add_offset` and a `missing_value`
    Short { scale: f64, offset: f64, missing: i16 },
}

/// Description of a single-variable ERA5-style netCDF file.
#[derive(Debug, Clone)]
pub struct NetCdfFixture {
    pub variable: String,
    pub time_name: String,
    /// Dimension order of the data variable
    pub dims: [String; 3],
    /// Time values, written as doubles
    pub time: Vec<i64>,
    /// CF `units` attribute for the time coordinate, if any
    pub time_units: Option<String>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    /// Row-major values in Kelvin; NaN becomes the missing value when packed
    pub values: Vec<f64>,
    pub packing: Packing,
    /// `units` attribute of the data variable
    pub data_units: String,
    /// Coordinate variables left out of the file
    pub omit_coordinates: Vec<String>,
    /// Coordinate variables written along a dimension of their own with this
    /// many values, instead of along the data dimension of the same name
    pub resized_coordinates: Vec<(String, usize)>,
}

impl NetCdfFixture {
    /// A file laid out like a CDS ERA5 single-levels download.
    pub fn era5_like(n_time: usize, n_lat: usize, n_lon: usize) -> Self {
        Self {
            variable: "t2m".to_string(),
            time_name: "valid_time".to_string(),
            dims: [
                "valid_time".to_string(),
                "latitude".to_string(),
                "longitude".to_string(),
            ],
            time: hourly_axis(ERA5_DAY_START, n_time),
            time_units: Some("seconds since 1970-01-01".to_string()),
            latitude: era5_latitudes(n_lat),
            longitude: era5_longitudes(n_lon),
            values: synthetic_values(n_time, n_lat, n_lon),
            packing: Packing::Float,
            data_units: "K".to_string(),
            omit_coordinates: Vec::new(),
            resized_coordinates: Vec::new(),
        }
    }

    /// Set the value at one position of the row-major data.
    pub fn set_value(&mut self, time_index: usize, lat_index: usize, lon_index: usize, value: f64) {
        let idx = (time_index * self.latitude.len() + lat_index) * self.longitude.len() + lon_index;
        self.values[idx] = value;
    }

    /// Write the file as `dir/file_name` and return its path.
    pub fn write(&self, dir: &Path, file_name: &str) -> Result<PathBuf, netcdf::Error> {
        let path = dir.join(file_name);
        let mut file = netcdf::create(&path)?;

        for name in &self.dims {
            let len = if *name == self.time_name {
                self.time.len()
            } else if name == "latitude" {
                self.latitude.len()
            } else {
                self.longitude.len()
            };
            file.add_dimension(name, len)?;
        }

        let time_values: Vec<f64> = self.time.iter().map(|&t| t as f64).collect();
        let coordinates = [
            (self.time_name.as_str(), &time_values, self.time_units.as_deref()),
            ("latitude", &self.latitude, Some("degrees_north")),
            ("longitude", &self.longitude, Some("degrees_east")),
        ];
        for (name, values, units) in coordinates {
            if self.omit_coordinates.iter().any(|n| n == name) {
                continue;
            }
            let resized = self
                .resized_coordinates
                .iter()
                .find(|(n, _)| n == name)
                .map(|&(_, len)| len);
            let mut var = match resized {
                Some(len) => {
                    let dim = format!("{}_resized", name);
                    file.add_dimension(&dim, len)?;
                    let mut var = file.add_variable::<f64>(name, &[dim.as_str()])?;
                    let data: Vec<f64> = (0..len).map(|i| i as f64).collect();
                    var.put_values(&data, ..)?;
                    var
                }
                None => {
                    let mut var = file.add_variable::<f64>(name, &[name])?;
                    var.put_values(values, ..)?;
                    var
                }
            };
            if let Some(units) = units {
                var.put_attribute("units", units)?;
            }
        }

        let dims: Vec<&str> = self.dims.iter().map(String::as_str).collect();
        match self.packing {
            Packing::Float => {
                let data: Vec<f32> = self.values.iter().map(|&v| v as f32).collect();
                let mut var = file.add_variable::<f32>(&self.variable, &dims)?;
                var.put_values(&data, ..)?;
                var.put_attribute("units", self.data_units.as_str())?;
            }
            Packing::Short { scale, offset, missing } => {
                let data: Vec<i16> = self
                    .values
                    .iter()
                    .map(|&v| {
                        if v.is_nan() {
                            missing
                        } else {
                            ((v - offset) / scale).round() as i16
                        }
                    })
                    .collect();
                let mut var = file.add_variable::<i16>(&self.variable, &dims)?;
                var.put_values(&data, ..)?;
                var.put_attribute("units", self.data_units.as_str())?;
                var.put_attribute("scale_factor", scale)?;
                var.put_attribute("add_offset", offset)?;
                var.put_attribute("missing_value", missing)?;
            }
        }

        Ok(path)
    }
}
