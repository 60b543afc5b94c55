//! NetCDF reader for ERA5 reanalysis data.
//!
//! Reads one `(time, latitude, longitude)` variable plus its coordinate
//! variables into an [`era5_common::Grid`]. Packed variables
//! (`scale_factor`/`add_offset`) are unpacked, fill values become NaN, and
//! CF time units are normalised to epoch seconds.

pub mod error;
pub mod native;
pub mod time_units;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_grid, silence_hdf5_errors, LoadedGrid, VariableNames};
pub use time_units::TimeUnits;
