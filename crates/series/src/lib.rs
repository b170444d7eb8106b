//! # kairos-series
//!
//! Immutable, timestamp-indexed univariate series and the small set of
//! deterministic operations the rest of the workspace derives new series
//! with.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Series::new(index, values)?"] --> B["Series"]
//!     B -->|".diff(lag)?"| B
//!     B -->|"LevelTransform::apply()"| B
//!     B -->|".split_tail(k)?"| C["(train, test)"]
//!     D["Frequency"] -->|".seasonality()"| E["s"]
//!     D -->|".future_index(last, h)?"| F["Vec of NaiveDateTime"]
//! ```
//!
//! Every operation returns a new [`Series`]; nothing mutates in place.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `series` | Validated timestamp/value container |
//! | `frequency` | Sampling frequency, seasonality constants, calendar stepping |
//! | `transform` | Level transforms (`identity`, `log1p`) and their inverses |
//! | `error` | Error types |

mod error;
mod frequency;
mod series;
mod transform;

pub use error::SeriesError;
pub use frequency::Frequency;
pub use series::Series;
pub use transform::LevelTransform;
