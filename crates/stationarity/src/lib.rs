//! # kairos-stationarity
//!
//! Picks a transformation that makes a series stationary, judged by the
//! Augmented Dickey-Fuller test at the 1% level.
//!
//! ```mermaid
//! graph LR
//!     A["Series"] -->|"evaluate(series, s, Mode::Auto)"| B["6 candidates, tested in parallel"]
//!     B -->|"lowest significant statistic"| C["TransformationCandidate"]
//!     A -->|"evaluate(series, s, Mode::Forced { .. })"| C
//!     C --> D[".transformed_series()"]
//!     C --> E[".d() / .seasonal_d() / .transform()"]
//! ```
//!
//! | Candidate | Tested series | d | D | level transform |
//! |-----------|---------------|---|---|-----------------|
//! | Absolute | `y` | 0 | 0 | identity |
//! | First Difference | `Δy` | 1 | 0 | identity |
//! | Log Transform | `log1p(y)` | 0 | 0 | log1p |
//! | Seasonal Difference | `Δ_s y` | 0 | 1 | identity |
//! | Log Difference | `Δ log1p(y)` | 1 | 0 | log1p |
//! | Seasonal Log Difference | `Δ_s Δ log1p(y)` | 1 | 1 | log1p |
//! | Custom Difference (forced) | `Δ_s^D Δ^d y` | d | D | identity |
//!
//! A candidate whose statistic does not beat the 1% critical value keeps
//! its results but has no [`label`](TransformationCandidate::label).

mod adf;
mod candidate;
mod error;
mod mackinnon;
mod transformer;

pub use adf::{AdfResult, MIN_OBSERVATIONS, adfuller};
pub use candidate::{
    CandidateKind, CustomDifference, RollingStats, TransformationCandidate,
};
pub use error::StationarityError;
pub use mackinnon::{CriticalValues, critical_values, p_value};
pub use transformer::{
    Attempt, Mode, StationarityOutcome, StationarityWarning, derive_series, evaluate,
    test_candidate,
};
