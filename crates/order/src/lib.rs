//! # kairos-order
//!
//! Reads starting orders `(p, q, P, Q)` for a seasonal ARIMA model off the
//! correlogram of an already stationary series.
//!
//! ```mermaid
//! graph LR
//!     A["transformed Series"] -->|"pacf_yw / acf, 2s lags"| B["Correlogram"]
//!     B -->|"consecutive run from lag 1"| C["p (PACF), q (ACF)"]
//!     B -->|"checkpoints at s and 2s"| D["P (PACF), Q (ACF)"]
//! ```
//!
//! The non-seasonal terms count a run of significant lags that ends at the
//! first insignificant one. The seasonal terms only look at lags `s` and
//! `2s`, and the second one counts only if the first did.

mod error;
mod estimator;

pub use error::OrderError;
pub use estimator::{
    Correlogram, OrderEstimate, correlogram, estimate, from_correlogram, seasonal_terms,
    significant_run,
};
