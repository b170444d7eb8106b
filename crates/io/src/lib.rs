//! # kairos-io
//!
//! Read a timestamped series (and its exogenous regressors) from CSV, and
//! write forecasts and run reports. Bridges delimited text files into the
//! [`kairos_series::Series`] type the rest of the workspace works on.
//!
//! ```mermaid
//! graph LR
//!     A["CSV file"] -->|"read_csv(path, &ReaderConfig)?"| B["Dataset { series, exog }"]
//!     C["ForecastTable::new(..)?"] -->|"write_forecast_csv(path, &table, &WriterConfig)?"| D["forecast CSV"]
//!     E["impl Serialize"] -->|"write_json_report(path, &report, &WriterConfig)?"| F["JSON report"]
//! ```

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{Dataset, RECOMMENDED_MIN_ROWS, ReaderConfig, detect_delimiter, read_csv};
pub use writer::{ForecastTable, WriterConfig, write_forecast_csv, write_json_report};
