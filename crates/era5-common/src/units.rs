//! Unit conversions applied to extracted series.

/// Offset between Kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert a Kelvin temperature to degrees Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Unit transformation for converting raw data values to display values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitTransform {
    /// Values are already in the display unit
    #[default]
    None,
    /// K→°C via [`kelvin_to_celsius`]
    KelvinToCelsius,
}

impl UnitTransform {
    /// Apply the transformation to a value
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::None => value,
            Self::KelvinToCelsius => kelvin_to_celsius(value),
        }
    }

    /// Apply elementwise, keeping order and length.
    pub fn apply_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.apply(v)).collect()
    }

    /// Transform that brings a temperature with the given CF `units`
    /// attribute to degrees Celsius.
    ///
    /// A missing attribute is read as Kelvin, which is what ERA5 stores.
    /// Returns `None` for units that are not a temperature scale.
    pub fn celsius_from(units: Option<&str>) -> Option<Self> {
        let Some(units) = units else {
            return Some(Self::KelvinToCelsius);
        };
        match units.trim() {
            "K" | "kelvin" | "Kelvin" | "degK" => Some(Self::KelvinToCelsius),
            "degC" | "°C" | "C" | "celsius" | "Celsius" | "degree_Celsius" | "degrees_Celsius" => {
                Some(Self::None)
            }
            _ => None,
        }
    }
}
