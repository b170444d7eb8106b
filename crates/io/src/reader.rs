//! CSV reader configuration and ingestion.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use kairos_series::Series;
use tracing::{debug, info, warn};

use crate::error::IoError;

/// Fewer rows than this are read but flagged as too short for a reliable
/// model.
pub const RECOMMENDED_MIN_ROWS: usize = 30;

/// Delimiters tried, in order, when none is configured.
const DELIMITER_CANDIDATES: [u8; 3] = [b';', b',', b'|'];

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading a time series from a delimited text file.
///
/// Use the builder methods (`with_*`) to name the timestamp, value and
/// exogenous columns. The [`Default`] implementation expects columns
/// `date` and `value`, sniffs the delimiter from the header line and sorts
/// rows by timestamp.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Column holding the timestamps.
    date_column: String,
    /// Column holding the observed values.
    value_column: String,
    /// Columns read as exogenous regressors.
    exog_columns: Vec<String>,
    /// `chrono` formats tried in order for each timestamp.
    date_formats: Vec<String>,
    /// Field delimiter, or `None` to detect it from the header line.
    delimiter: Option<u8>,
    /// Whether to sort rows by timestamp before building the series.
    sort: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            date_column: "date".into(),
            value_column: "value".into(),
            exog_columns: Vec::new(),
            date_formats: vec![
                "%Y-%m-%d %H:%M:%S".into(),
                "%Y-%m-%dT%H:%M:%S".into(),
                "%Y-%m-%d %H:%M".into(),
                "%Y-%m-%d".into(),
                "%Y/%m/%d".into(),
                "%d.%m.%Y".into(),
                "%Y-%m".into(),
            ],
            delimiter: None,
            sort: true,
        }
    }
}

impl ReaderConfig {
    /// Set the timestamp column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Set the value column name.
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Set the exogenous regressor columns.
    pub fn with_exog_columns(mut self, names: Vec<String>) -> Self {
        self.exog_columns = names;
        self
    }

    /// Replace the timestamp formats. Formats without a day (`%Y-%m`)
    /// resolve to the first of the month.
    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }

    /// Set the field delimiter, or `None` to detect it.
    pub fn with_delimiter(mut self, delimiter: Option<u8>) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable sorting rows by timestamp.
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn exog_columns(&self) -> &[String] {
        &self.exog_columns
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every problem found: empty
    /// column names, no date formats, or a column used twice.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.date_column.is_empty() {
            problems.push("date column name is empty".to_string());
        }
        if self.value_column.is_empty() {
            problems.push("value column name is empty".to_string());
        }
        if self.date_formats.is_empty() {
            problems.push("at least one date format is required".to_string());
        }
        let mut seen = vec![self.date_column.as_str(), self.value_column.as_str()];
        if self.date_column == self.value_column {
            problems.push(format!("column '{}' is used twice", self.date_column));
        }
        for name in &self.exog_columns {
            if seen.contains(&name.as_str()) {
                problems.push(format!("column '{name}' is used twice"));
            }
            seen.push(name);
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }

    fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        self.date_formats.iter().find_map(|fmt| parse_with(raw, fmt))
    }
}

/// Parses `raw` as a datetime, a date at midnight, or a month at its first
/// day.
fn parse_with(raw: &str, fmt: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
        return Some(ts);
    }
    let date = if fmt.contains("%d") {
        NaiveDate::parse_from_str(raw, fmt).ok()?
    } else {
        NaiveDate::parse_from_str(&format!("{raw}-01"), &format!("{fmt}-%d")).ok()?
    };
    date.and_hms_opt(0, 0, 0)
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// A series read from disk together with its exogenous columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The observed values on their timestamp index.
    pub series: Series,
    /// `(name, values)` per exogenous column, aligned with `series`.
    pub exog: Vec<(String, Vec<f64>)>,
}

impl Dataset {
    /// `true` when at least one exogenous column was read.
    pub fn has_exog(&self) -> bool {
        !self.exog.is_empty()
    }
}

// ---------------------------------------------------------------------------
// read_csv
// ---------------------------------------------------------------------------

/// Sniffs the delimiter from the first line: `;`, then `,`, then `|`,
/// falling back to `;`.
pub fn detect_delimiter(header: &str) -> u8 {
    DELIMITER_CANDIDATES
        .into_iter()
        .find(|d| header.as_bytes().contains(d))
        .unwrap_or(b';')
}

fn sniff_delimiter(path: &Path) -> Result<u8, IoError> {
    let mut header = String::new();
    BufReader::new(File::open(path)?).read_line(&mut header)?;
    Ok(detect_delimiter(&header))
}

fn column_position(
    headers: &csv::StringRecord,
    name: &str,
    path: &Path,
) -> Result<usize, IoError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn parse_value(raw: &str, column: &str, line: u64) -> Result<f64, IoError> {
    let value: f64 = raw.parse().map_err(|_| IoError::DataFormat {
        line,
        reason: format!("cannot parse {raw:?} in column '{column}' as a number"),
    })?;
    if !value.is_finite() {
        return Err(IoError::DataFormat {
            line,
            reason: format!("non-finite value {raw:?} in column '{column}'"),
        });
    }
    Ok(value)
}

/// Read a time series (and optional exogenous columns) from a CSV file.
///
/// Rows are sorted by timestamp when the config asks for it; duplicate
/// timestamps are always rejected.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::Validation`] | invalid [`ReaderConfig`] (checked before opening the file) |
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::MissingColumn`] | a configured column is not in the header |
/// | [`IoError::DataFormat`] | an unparseable timestamp, number, or a non-finite value |
/// | [`IoError::Series`] | no rows, duplicate or (unsorted) decreasing timestamps |
#[tracing::instrument(skip(path, config), fields(path = %path.display()))]
pub fn read_csv(path: &Path, config: &ReaderConfig) -> Result<Dataset, IoError> {
    config.validate()?;
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let delimiter = match config.delimiter {
        Some(d) => d,
        None => sniff_delimiter(path)?,
    };
    debug!(delimiter = %char::from(delimiter), "reading csv");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let date_pos = column_position(&headers, &config.date_column, path)?;
    let value_pos = column_position(&headers, &config.value_column, path)?;
    let exog_pos = config
        .exog_columns
        .iter()
        .map(|name| column_position(&headers, name, path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows: Vec<(NaiveDateTime, f64, Vec<f64>)> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let field = |pos: usize| record.get(pos).unwrap_or("");

        let raw_date = field(date_pos);
        let ts = config
            .parse_timestamp(raw_date)
            .ok_or_else(|| IoError::DataFormat {
                line,
                reason: format!("cannot parse timestamp {raw_date:?}"),
            })?;
        let value = parse_value(field(value_pos), &config.value_column, line)?;
        let exog = exog_pos
            .iter()
            .zip(&config.exog_columns)
            .map(|(&pos, name)| parse_value(field(pos), name, line))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push((ts, value, exog));
    }

    if config.sort {
        rows.sort_by_key(|(ts, _, _)| *ts);
    }

    let n = rows.len();
    let mut index = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    let mut exog: Vec<(String, Vec<f64>)> = config
        .exog_columns
        .iter()
        .map(|name| (name.clone(), Vec::with_capacity(n)))
        .collect();
    for (ts, value, row_exog) in rows {
        index.push(ts);
        values.push(value);
        for ((_, column), x) in exog.iter_mut().zip(row_exog) {
            column.push(x);
        }
    }

    let series = Series::new(index, values)?;
    if series.len() < RECOMMENDED_MIN_ROWS {
        warn!(
            rows = series.len(),
            recommended = RECOMMENDED_MIN_ROWS,
            "few data points; forecasts may be unreliable"
        );
    }
    info!(
        rows = series.len(),
        exog = exog.len(),
        first = %series.first_timestamp(),
        last = %series.last_timestamp(),
        "series loaded"
    );
    Ok(Dataset { series, exog })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn default_config_values() {
        let config = ReaderConfig::default();
        assert_eq!(config.date_column(), "date");
        assert_eq!(config.value_column(), "value");
        assert!(config.exog_columns().is_empty());
        assert_eq!(config.delimiter, None);
        assert!(config.sort);
    }

    #[test]
    fn builder_methods() {
        let config = ReaderConfig::default()
            .with_date_column("ds")
            .with_value_column("y")
            .with_exog_columns(vec!["promo".into()])
            .with_delimiter(Some(b'\t'))
            .with_sort(false);
        assert_eq!(config.date_column(), "ds");
        assert_eq!(config.value_column(), "y");
        assert_eq!(config.exog_columns(), ["promo".to_string()]);
        assert_eq!(config.delimiter, Some(b'\t'));
        assert!(!config.sort);
    }

    #[test]
    fn validate_ok() {
        assert!(ReaderConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_collects_every_problem() {
        let config = ReaderConfig::default()
            .with_value_column("")
            .with_date_formats(Vec::new());
        match config.validate().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("value column"));
                assert!(details.contains("date format"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_reused_column() {
        let config = ReaderConfig::default().with_exog_columns(vec!["value".into()]);
        assert!(matches!(
            config.validate(),
            Err(IoError::Validation { count: 1, .. })
        ));
    }

    #[test]
    fn parses_each_default_format() {
        let config = ReaderConfig::default();
        let expected = ts(2021, 3, 1);
        for raw in [
            "2021-03-01 00:00:00",
            "2021-03-01T00:00:00",
            "2021-03-01",
            "2021/03/01",
            "01.03.2021",
            "2021-03",
        ] {
            assert_eq!(config.parse_timestamp(raw), Some(expected), "{raw}");
        }
        assert_eq!(
            config.parse_timestamp("2021-03-01 14:30"),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap().and_hms_opt(14, 30, 0)
        );
        assert_eq!(config.parse_timestamp("March 2021"), None);
    }

    #[test]
    fn month_format_needs_a_valid_month() {
        assert_eq!(parse_with("2021-13", "%Y-%m"), None);
    }

    #[test]
    fn delimiter_detection_order() {
        assert_eq!(detect_delimiter("date;value,x"), b';');
        assert_eq!(detect_delimiter("date,value"), b',');
        assert_eq!(detect_delimiter("date|value"), b'|');
        assert_eq!(detect_delimiter("value"), b';');
    }

    #[test]
    fn parse_value_rejects_text_and_infinity() {
        assert_eq!(parse_value("2.5", "y", 3).unwrap(), 2.5);
        assert!(matches!(
            parse_value("abc", "y", 3),
            Err(IoError::DataFormat { line: 3, .. })
        ));
        assert!(matches!(
            parse_value("inf", "y", 4),
            Err(IoError::DataFormat { line: 4, .. })
        ));
    }
}
