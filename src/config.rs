use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Kairos configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct KairosConfig {
    /// Input and output settings.
    #[serde(default)]
    pub io: IoToml,

    /// Frequency and train/test split.
    #[serde(default)]
    pub series: SeriesToml,

    /// Stationarity transformation selection.
    #[serde(default)]
    pub transformation: TransformationToml,

    /// Model order overrides and fit options.
    #[serde(default)]
    pub model: ModelToml,

    /// Order grid search.
    #[serde(default)]
    pub grid_search: GridSearchToml,
}

impl KairosConfig {
    /// Reads and parses a TOML file, or returns the defaults for `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default)]
    pub exog_columns: Vec<String>,
    #[serde(default)]
    pub date_formats: Option<Vec<String>>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default = "default_true")]
    pub sort: bool,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            report: None,
            date_column: default_date_column(),
            value_column: default_value_column(),
            exog_columns: Vec::new(),
            date_formats: None,
            delimiter: None,
            sort: true,
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_date_column() -> String {
    "date".to_string()
}
fn default_value_column() -> String {
    "value".to_string()
}
fn default_true() -> bool {
    true
}
fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesToml {
    #[serde(default = "default_frequency")]
    pub frequency: String,
    /// Held-out points; defaults to the seasonality.
    #[serde(default)]
    pub test_size: Option<usize>,
    /// Forecast horizon; defaults to half the seasonality.
    #[serde(default)]
    pub periods: Option<usize>,
}

impl Default for SeriesToml {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            test_size: None,
            periods: None,
        }
    }
}

fn default_frequency() -> String {
    "monthly".to_string()
}

/// `method = "auto"` tests the six fixed candidates; any candidate label
/// forces it. `d`/`seasonal_d` are read for the custom difference only.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformationToml {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub d: Option<usize>,
    #[serde(default)]
    pub seasonal_d: Option<usize>,
}

impl Default for TransformationToml {
    fn default() -> Self {
        Self {
            method: default_method(),
            d: None,
            seasonal_d: None,
        }
    }
}

fn default_method() -> String {
    "auto".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    /// Overrides of the estimated orders.
    #[serde(default)]
    pub p: Option<usize>,
    #[serde(default)]
    pub q: Option<usize>,
    #[serde(default)]
    pub seasonal_p: Option<usize>,
    #[serde(default)]
    pub seasonal_q: Option<usize>,
    #[serde(default = "default_true")]
    pub include_mean: bool,
    #[serde(default)]
    pub enforce_invertibility: bool,
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
    #[serde(default)]
    pub timeout_secs: Option<f64>,
    #[serde(default = "default_initialization")]
    pub initialization: String,
    #[serde(default = "default_level")]
    pub level: f64,
}

impl Default for ModelToml {
    fn default() -> Self {
        Self {
            p: None,
            q: None,
            seasonal_p: None,
            seasonal_q: None,
            include_mean: true,
            enforce_invertibility: false,
            max_iters: default_max_iters(),
            sd_tolerance: default_sd_tolerance(),
            timeout_secs: None,
            initialization: default_initialization(),
            level: default_level(),
        }
    }
}

fn default_max_iters() -> u64 {
    2000
}
fn default_sd_tolerance() -> f64 {
    1e-8
}
fn default_initialization() -> String {
    "stationary".to_string()
}
fn default_level() -> f64 {
    0.95
}

/// Explicit value lists replace the default `0..=x + 1` range around the
/// estimated order.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GridSearchToml {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub p_values: Option<Vec<usize>>,
    #[serde(default)]
    pub q_values: Option<Vec<usize>>,
    #[serde(default)]
    pub seasonal_p_values: Option<Vec<usize>>,
    #[serde(default)]
    pub seasonal_q_values: Option<Vec<usize>>,
    /// Per-fit timeout during the search.
    #[serde(default)]
    pub timeout_secs: Option<f64>,
}
