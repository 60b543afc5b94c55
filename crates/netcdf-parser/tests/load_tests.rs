//! Loader tests against synthetic netCDF files.

use netcdf_parser::{load_grid, NetCdfError, VariableNames};
use test_utils::{
    assert_approx_eq, require_test_file, synthetic_kelvin, temp_test_dir, NetCdfFixture, Packing,
    ERA5_DAY_START,
};

#[test]
fn test_load_float_file() {
    let dir = temp_test_dir();
    let path = NetCdfFixture::era5_like(24, 6, 5)
        .write(dir.path(), "float.nc")
        .unwrap();

    let loaded = load_grid(&path, &VariableNames::default()).unwrap();
    let shape = loaded.grid.shape();
    assert_eq!((shape.n_time, shape.n_lat, shape.n_lon), (24, 6, 5));
    assert_eq!(loaded.grid.time()[0], ERA5_DAY_START);
    assert_eq!(loaded.units.as_deref(), Some("K"));
    assert_eq!(loaded.missing_values, 0);

    let value = loaded.grid.value_at(13, 2, 4).unwrap();
    assert_approx_eq!(value, synthetic_kelvin(13, 2, 4), 1e-4);
}

#[test]
fn test_load_packed_file_with_missing_value() {
    let dir = temp_test_dir();
    let mut fixture = NetCdfFixture::era5_like(4, 3, 3);
    fixture.packing = Packing::Short {
        scale: 0.001,
        offset: 290.0,
        missing: -32767,
    };
    fixture.set_value(1, 1, 1, f64::NAN);
    let path = fixture.write(dir.path(), "packed.nc").unwrap();

    let loaded = load_grid(&path, &VariableNames::default()).unwrap();
    assert_eq!(loaded.missing_values, 1);
    assert!(loaded.grid.value_at(1, 1, 1).unwrap().is_nan());
    assert_approx_eq!(
        loaded.grid.value_at(2, 0, 2).unwrap(),
        synthetic_kelvin(2, 0, 2),
        0.001
    );
}

#[test]
fn test_hours_since_1900_time_axis() {
    let dir = temp_test_dir();
    let mut fixture = NetCdfFixture::era5_like(2, 2, 2);
    fixture.time = vec![1_081_704, 1_081_705];
    fixture.time_units = Some("hours since 1900-01-01 00:00:00.0".to_string());
    let path = fixture.write(dir.path(), "legacy_time.nc").unwrap();

    let loaded = load_grid(&path, &VariableNames::default()).unwrap();
    assert_eq!(loaded.grid.time(), &[ERA5_DAY_START, ERA5_DAY_START + 3600]);
}

#[test]
fn test_missing_file() {
    let dir = temp_test_dir();
    let err = load_grid(dir.path().join("absent.nc"), &VariableNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::FileNotAccessible { .. }));
}

#[test]
fn test_not_a_netcdf_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("garbage.nc");
    std::fs::write(&path, b"this is not netcdf").unwrap();
    let err = load_grid(&path, &VariableNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::FileNotAccessible { .. }));
}

#[test]
fn test_missing_variable() {
    let dir = temp_test_dir();
    let path = NetCdfFixture::era5_like(2, 2, 2)
        .write(dir.path(), "t2m.nc")
        .unwrap();
    let names = VariableNames {
        data: "sst".to_string(),
        ..VariableNames::default()
    };
    let err = load_grid(&path, &names).unwrap_err();
    assert!(matches!(err, NetCdfError::MissingData(_)));
}

#[test]
fn test_wrong_dimension_order() {
    let dir = temp_test_dir();
    let mut fixture = NetCdfFixture::era5_like(2, 3, 4);
    fixture.dims = [
        "valid_time".to_string(),
        "longitude".to_string(),
        "latitude".to_string(),
    ];
    let path = fixture.write(dir.path(), "swapped.nc").unwrap();
    let err = load_grid(&path, &VariableNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::SchemaMismatch(_)));
}

#[test]
fn test_time_overflowing_after_units_is_invalid_timestamp() {
    let dir = temp_test_dir();
    let mut fixture = NetCdfFixture::era5_like(2, 3, 34);
    fixture.time = vec![0, 200_000_000_000_000_000];
    fixture.time_units = Some("days since 1970-01-01".to_string());
    let path = fixture.write(dir.path(), "far_future.nc").unwrap();

    let err = load_grid(&path, &VariableNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::InvalidTimestamp(v) if v == 2e17));
}

#[test]
fn test_missing_coordinate_variable() {
    let dir = temp_test_dir();
    let mut fixture = NetCdfFixture::era5_like(2, 3, 4);
    fixture.omit_coordinates = vec!["latitude".to_string()];
    let path = fixture.write(dir.path(), "no_lat.nc").unwrap();

    let err = load_grid(&path, &VariableNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::MissingData(ref what) if what.contains("latitude")));
}

#[test]
fn test_coordinate_length_differs_from_dimension() {
    let dir = temp_test_dir();
    let mut fixture = NetCdfFixture::era5_like(2, 3, 4);
    fixture.resized_coordinates = vec![("longitude".to_string(), 6)];
    let path = fixture.write(dir.path(), "long_lon.nc").unwrap();

    let err = load_grid(&path, &VariableNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::SchemaMismatch(ref msg) if msg.contains("longitude")));
}

#[test]
fn test_descending_time_axis() {
    let dir = temp_test_dir();
    let mut fixture = NetCdfFixture::era5_like(2, 2, 2);
    fixture.time = vec![ERA5_DAY_START + 3600, ERA5_DAY_START];
    let path = fixture.write(dir.path(), "backwards.nc").unwrap();

    let err = load_grid(&path, &VariableNames::default()).unwrap_err();
    assert!(matches!(err, NetCdfError::SchemaMismatch(_)));
}

#[test]
fn test_real_era5_file() {
    let path = require_test_file!("ERA5_2mT_SST_CBH.nc");
    let loaded = load_grid(&path, &VariableNames::default()).unwrap();
    let shape = loaded.grid.shape();
    assert_eq!((shape.n_time, shape.n_lat, shape.n_lon), (24, 194, 37));
}
