//! Native NetCDF reading using the netcdf library.
//!
//! The whole data variable is read into memory in one call; a one-day
//! ERA5 subset is a few hundred thousand values, so there is nothing to
//! gain from strided reads.

use std::path::Path;
use std::sync::Once;

use era5_common::Grid;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NetCdfError, NetCdfResult};
use crate::time_units::TimeUnits;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Call early in `main()`, before any netCDF operation. Safe to call more
/// than once.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Names of the data variable and its coordinate variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableNames {
    /// 3-D data variable, e.g. `t2m`
    pub data: String,
    /// Time coordinate, e.g. `valid_time`
    pub time: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            data: "t2m".to_string(),
            time: "valid_time".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

/// A grid read from disk, with the metadata needed downstream.
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    pub grid: Grid,
    /// `units` attribute of the data variable (e.g. "K")
    pub units: Option<String>,
    /// Number of values replaced by NaN because they matched the fill value
    pub missing_values: usize,
}

/// Open a netCDF file and load one `(time, latitude, longitude)` variable.
pub fn load_grid<P: AsRef<Path>>(path: P, names: &VariableNames) -> NetCdfResult<LoadedGrid> {
    let path = path.as_ref();
    silence_hdf5_errors();

    if !path.is_file() {
        return Err(NetCdfError::FileNotAccessible {
            path: path.display().to_string(),
            reason: "no such file".to_string(),
        });
    }

    let nc_file = netcdf::open(path).map_err(|e| NetCdfError::FileNotAccessible {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let var = nc_file
        .variable(&names.data)
        .ok_or_else(|| NetCdfError::MissingData(format!("variable '{}'", names.data)))?;

    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();
    debug!(variable = %names.data, dims = ?dims, "Found data variable");

    let expected = [&names.time, &names.latitude, &names.longitude];
    if dims.len() != 3 || dims.iter().zip(expected).any(|((name, _), want)| name != want) {
        let found: Vec<&str> = dims.iter().map(|(n, _)| n.as_str()).collect();
        return Err(NetCdfError::SchemaMismatch(format!(
            "variable '{}' has dimensions {:?}, expected [{}, {}, {}]",
            names.data, found, names.time, names.latitude, names.longitude
        )));
    }

    let raw_time = read_coordinate(&nc_file, &names.time, dims[0].1)?;
    let latitude = read_coordinate(&nc_file, &names.latitude, dims[1].1)?;
    let longitude = read_coordinate(&nc_file, &names.longitude, dims[2].1)?;

    let time_units = match nc_file
        .variable(&names.time)
        .and_then(|v| get_string_attr(&v, "units"))
    {
        Some(units) => TimeUnits::parse(&units)?,
        None => TimeUnits::EPOCH_SECONDS,
    };
    let time = raw_time
        .iter()
        .map(|&t| {
            time_units
                .to_epoch_seconds(t)
                .ok_or(NetCdfError::InvalidTimestamp(t))
        })
        .collect::<NetCdfResult<Vec<i64>>>()?;

    let raw: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", names.data, e)))?;

    let scale_factor = get_f64_attr(&var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(&var, "add_offset").unwrap_or(0.0);
    let fill_values: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| get_f64_attr(&var, name))
        .collect();
    debug!(scale_factor, add_offset, fill = ?fill_values, "Packing attributes");

    let mut missing_values = 0usize;
    let values: Vec<f64> = raw
        .iter()
        .map(|&v| {
            if v.is_nan() || fill_values.contains(&v) {
                missing_values += 1;
                f64::NAN
            } else {
                v * scale_factor + add_offset
            }
        })
        .collect();
    if missing_values > 0 {
        warn!(count = missing_values, variable = %names.data, "Fill values replaced by NaN");
    }

    let units = get_string_attr(&var, "units");

    let grid = Grid::new(time, latitude, longitude, values)
        .map_err(|e| NetCdfError::SchemaMismatch(e.to_string()))?;

    info!(
        path = %path.display(),
        variable = %names.data,
        shape = %grid.shape(),
        "Loaded grid"
    );

    Ok(LoadedGrid {
        grid,
        units,
        missing_values,
    })
}

fn read_coordinate(file: &netcdf::File, name: &str, expected_len: usize) -> NetCdfResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("coordinate variable '{}'", name)))?;

    let values: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    if values.len() != expected_len {
        return Err(NetCdfError::SchemaMismatch(format!(
            "coordinate '{}' has {} values but its dimension has {}",
            name,
            values.len(),
            expected_len
        )));
    }
    Ok(values)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

// Numeric attributes of any stored type are widened to f64
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
