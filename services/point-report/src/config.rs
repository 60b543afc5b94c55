//! Analysis configuration.
//!
//! Defaults reproduce the reference run: `t2m` from `ERA5_2mT_SST_CBH.nc`
//! at latitude index 2, longitude index 33, hot threshold 30 °C. A YAML
//! file can override any field, and command-line flags override the file.
//! YAML values support `${VAR}` and `${VAR:-default}` substitution.

use anyhow::{Context, Result};
use netcdf_parser::VariableNames;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use era5_common::DEFAULT_HOT_THRESHOLD_CELSIUS;

/// Top-level configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// netCDF input file
    pub input_path: PathBuf,
    pub variables: VariableNames,
    pub location: LocationConfig,
    /// Readings at or above this many °C count as hot
    pub hot_threshold_celsius: f64,
    pub chart: ChartConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("ERA5_2mT_SST_CBH.nc"),
            variables: VariableNames::default(),
            location: LocationConfig::default(),
            hot_threshold_celsius: DEFAULT_HOT_THRESHOLD_CELSIUS,
            chart: ChartConfig::default(),
        }
    }
}

/// Zero-based grid indices of the analysed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub lat_index: usize,
    pub lon_index: usize,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lat_index: 2,
            lon_index: 33,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_path: PathBuf::from("t2m_point.png"),
            width: 1000,
            height: 600,
        }
    }
}

/// Values given on the command line; `None` leaves the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_path: Option<PathBuf>,
    pub lat_index: Option<usize>,
    pub lon_index: Option<usize>,
    pub hot_threshold_celsius: Option<f64>,
    pub chart_path: Option<PathBuf>,
    pub no_chart: bool,
}

impl AnalysisConfig {
    /// Load from a YAML file; missing fields keep their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;

        let expanded = expand_env_vars(&content)?;

        let config: AnalysisConfig = serde_yaml::from_str(&expanded)
            .with_context(|| format!("Failed to parse config YAML from {:?}", path.as_ref()))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.input_path {
            self.input_path = path;
        }
        if let Some(lat) = overrides.lat_index {
            self.location.lat_index = lat;
        }
        if let Some(lon) = overrides.lon_index {
            self.location.lon_index = lon;
        }
        if let Some(threshold) = overrides.hot_threshold_celsius {
            self.hot_threshold_celsius = threshold;
        }
        if let Some(path) = overrides.chart_path {
            self.chart.output_path = path;
        }
        if overrides.no_chart {
            self.chart.enabled = false;
        }
    }

    /// Input path with a leading `~` expanded.
    pub fn resolved_input_path(&self) -> PathBuf {
        let raw = self.input_path.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.input_path.as_os_str().is_empty(),
            "Input path cannot be empty"
        );
        anyhow::ensure!(
            self.hot_threshold_celsius.is_finite(),
            "Hot threshold must be a finite number, got {}",
            self.hot_threshold_celsius
        );
        for (field, name) in [
            ("data", &self.variables.data),
            ("time", &self.variables.time),
            ("latitude", &self.variables.latitude),
            ("longitude", &self.variables.longitude),
        ] {
            anyhow::ensure!(!name.is_empty(), "Variable name '{}' cannot be empty", field);
        }
        if self.chart.enabled {
            anyhow::ensure!(
                self.chart.width > 0 && self.chart.height > 0,
                "Chart size must be non-zero, got {}x{}",
                self.chart.width,
                self.chart.height
            );
        }
        Ok(())
    }
}

/// Expand environment variables in YAML content
/// Supports ${VAR} and ${VAR:-default} syntax
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}
