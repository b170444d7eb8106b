//! Error types for kairos-io.

use std::path::PathBuf;

use kairos_series::SeriesError;

/// Error type for all fallible operations in the kairos-io crate.
///
/// Covers file-system failures, CSV and JSON encoding errors, malformed
/// rows, and series invariants violated by the ingested data.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the csv crate.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps a JSON serialisation failure.
    #[error("json error: {reason}")]
    Json {
        /// Description of the underlying JSON failure.
        reason: String,
    },

    /// Wraps an operating-system I/O failure.
    #[error("i/o error: {reason}")]
    Io {
        /// Description of the underlying I/O failure.
        reason: String,
    },

    /// Returned when a configured column is not in the header.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a cell cannot be parsed.
    #[error("line {line}: {reason}")]
    DataFormat {
        /// 1-based line number in the file.
        line: u64,
        /// What was wrong with the cell.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// The parsed rows do not form a valid series.
    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            reason: e.to_string(),
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.csv");
    }

    #[test]
    fn display_csv() {
        let err = IoError::Csv {
            reason: "unequal lengths".to_string(),
        };
        assert_eq!(err.to_string(), "csv error: unequal lengths");
    }

    #[test]
    fn display_json() {
        let err = IoError::Json {
            reason: "key must be a string".to_string(),
        };
        assert_eq!(err.to_string(), "json error: key must be a string");
    }

    #[test]
    fn display_io() {
        let err = IoError::Io {
            reason: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "i/o error: permission denied");
    }

    #[test]
    fn display_missing_column() {
        let err = IoError::MissingColumn {
            name: "sales".to_string(),
            path: PathBuf::from("/data/shop.csv"),
        };
        assert_eq!(err.to_string(), "column 'sales' not found in /data/shop.csv");
    }

    #[test]
    fn display_data_format() {
        let err = IoError::DataFormat {
            line: 14,
            reason: "cannot parse timestamp \"2021-13-01\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "line 14: cannot parse timestamp \"2021-13-01\""
        );
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "value column is empty; date formats are empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): value column is empty; date formats are empty"
        );
    }

    #[test]
    fn display_series_is_transparent() {
        let err = IoError::from(SeriesError::Empty);
        assert_eq!(err.to_string(), SeriesError::Empty.to_string());
    }

    #[test]
    fn from_csv_error() {
        let io = std::io::Error::other("test csv error");
        let err: IoError = csv::Error::from(io).into();
        assert!(matches!(err, IoError::Csv { .. }));
        assert!(err.to_string().contains("test csv error"));
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<f64>("not json").unwrap_err();
        let err: IoError = json_err.into();
        assert!(matches!(err, IoError::Json { .. }));
    }

    #[test]
    fn from_io_error() {
        let err: IoError = std::io::Error::other("disk full").into();
        assert!(matches!(err, IoError::Io { .. }));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
