//! Forecast CSV and JSON report writers.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::error::IoError;

/// Configuration for writing forecasts and reports.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// `chrono` format of the timestamp column.
    timestamp_format: String,
    /// Field delimiter of the forecast CSV.
    delimiter: u8,
    /// Whether the JSON report is pretty-printed.
    pretty: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d %H:%M:%S".into(),
            delimiter: b',',
            pretty: true,
        }
    }
}

impl WriterConfig {
    /// Sets the timestamp format.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Sets the CSV delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the timestamp format is empty.
    fn validate(&self) -> Result<(), IoError> {
        if self.timestamp_format.is_empty() {
            return Err(IoError::Validation {
                count: 1,
                details: "timestamp_format must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Borrowed view of a forecast with its confidence interval.
#[derive(Debug, Clone, Copy)]
pub struct ForecastTable<'a> {
    index: &'a [NaiveDateTime],
    mean: &'a [f64],
    lower: &'a [f64],
    upper: &'a [f64],
}

impl<'a> ForecastTable<'a> {
    /// Creates a table after checking that all columns have equal length.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] with one entry per mismatched column.
    pub fn new(
        index: &'a [NaiveDateTime],
        mean: &'a [f64],
        lower: &'a [f64],
        upper: &'a [f64],
    ) -> Result<Self, IoError> {
        let n = index.len();
        let columns = [
            ("forecast", mean.len()),
            ("lower", lower.len()),
            ("upper", upper.len()),
        ];
        let problems: Vec<String> = columns
            .into_iter()
            .filter(|&(_, len)| len != n)
            .map(|(name, len)| format!("{name} has {len} rows, index has {n}"))
            .collect();
        if !problems.is_empty() {
            return Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }
        Ok(Self {
            index,
            mean,
            lower,
            upper,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Formats `ts`, rejecting formats `chrono` cannot render.
fn format_timestamp(ts: NaiveDateTime, format: &str) -> Result<String, IoError> {
    let mut out = String::new();
    write!(out, "{}", ts.format(format)).map_err(|_| IoError::Validation {
        count: 1,
        details: format!("invalid timestamp_format {format:?}"),
    })?;
    Ok(out)
}

/// Write a forecast as CSV with columns `timestamp,forecast,lower,upper`.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for an invalid configuration,
/// [`IoError::Csv`] if the file cannot be created or written, and
/// [`IoError::Io`] if the final flush fails.
pub fn write_forecast_csv(
    path: &Path,
    table: &ForecastTable<'_>,
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_path(path)?;
    writer.write_record(["timestamp", "forecast", "lower", "upper"])?;
    for i in 0..table.len() {
        writer.write_record([
            format_timestamp(table.index[i], &config.timestamp_format)?,
            table.mean[i].to_string(),
            table.lower[i].to_string(),
            table.upper[i].to_string(),
        ])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = table.len(), "forecast written");
    Ok(())
}

/// Serialise `report` as JSON to `path`.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be created or written and
/// [`IoError::Json`] if serialisation fails.
pub fn write_json_report<T: Serialize + ?Sized>(
    path: &Path,
    report: &T,
    config: &WriterConfig,
) -> Result<(), IoError> {
    let mut writer = BufWriter::new(File::create(path)?);
    if config.pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = WriterConfig::default();
        assert_eq!(config.timestamp_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(config.delimiter, b',');
        assert!(config.pretty);
    }

    #[test]
    fn builder_methods() {
        let config = WriterConfig::default()
            .with_timestamp_format("%Y-%m")
            .with_delimiter(b';')
            .with_pretty(false);
        assert_eq!(config.timestamp_format, "%Y-%m");
        assert_eq!(config.delimiter, b';');
        assert!(!config.pretty);
    }

    #[test]
    fn validate_empty_timestamp_format() {
        let config = WriterConfig::default().with_timestamp_format("");
        match config.validate().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("timestamp_format"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_format_is_an_error() {
        let ts = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(format_timestamp(ts, "%Y-%m").unwrap(), "2020-01");
        assert!(matches!(
            format_timestamp(ts, "%Q"),
            Err(IoError::Validation { .. })
        ));
    }

    #[test]
    fn table_rejects_ragged_columns() {
        let origin = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let index = [origin; 3];
        let three = [0.0; 3];
        let two = [0.0; 2];
        match ForecastTable::new(&index, &three, &two, &two).unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("lower has 2 rows"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
        let table = ForecastTable::new(&index, &three, &three, &three).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }
}
