//! Error types for the kairos-sarima crate.

use std::time::Duration;

use kairos_series::SeriesError;
use kairos_stats::StatsError;

use crate::order::ModelOrder;

/// Error type for all fallible operations in the kairos-sarima crate.
///
/// Covers input validation, numerical failures inside the likelihood,
/// optimizer problems and the search-level outcomes of [`grid_search`].
///
/// [`grid_search`]: crate::grid_search
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SarimaError {
    /// Returned when the input series is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when too few observations remain after differencing.
    #[error(
        "insufficient data: got {n} observations, need at least {min}; \
         try smaller AR and MA terms (p, q, P, Q)"
    )]
    InsufficientData {
        /// Number of observations available after differencing.
        n: usize,
        /// Minimum number required.
        min: usize,
    },

    /// Returned when the series or an exogenous regressor contains NaN or
    /// infinity.
    #[error("input or exogenous data contains non-finite values")]
    NonFiniteData,

    /// Returned when the differenced, de-meaned series has zero variance.
    #[error("input data is constant after differencing (zero variance)")]
    ConstantData,

    /// Returned when the order is not a valid seasonal ARIMA order.
    #[error("invalid model order: {reason}")]
    InvalidOrder {
        /// What is wrong with the order.
        reason: String,
    },

    /// Returned when a configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Returned when the state covariance cannot be initialised or a
    /// prediction variance collapses.
    #[error("singular matrix in the state-space recursion")]
    SingularMatrix,

    /// Returned when a fit fails even with the alternate initialisation.
    #[error("model {order} did not converge: {reason}")]
    NonConvergence {
        /// The order that failed.
        order: ModelOrder,
        /// Error from the last attempt.
        reason: String,
    },

    /// Returned when the optimizer itself reports an error.
    #[error("optimisation failed: {reason}")]
    Optimization {
        /// Message reported by the optimizer.
        reason: String,
    },

    /// Returned when a fit exceeds its time limit.
    #[error("fit exceeded the time limit of {limit:?}")]
    Timeout {
        /// The configured limit.
        limit: Duration,
    },

    /// Returned when a grid search is cancelled.
    #[error("grid search cancelled")]
    Cancelled,

    /// Returned when no combination of a grid search could be fitted.
    #[error("no model converged: all {attempted} parameter combination(s) failed")]
    NoConvergentModel {
        /// Number of combinations tried.
        attempted: usize,
    },

    /// Returned when forecasting a model with regressors without future values.
    #[error("model was fitted with exogenous regressors; future values are required")]
    MissingFutureExog,

    /// Returned when an exogenous matrix has the wrong shape.
    #[error("exogenous data has shape {got:?}, expected {expected:?}")]
    ExogShape {
        /// Expected `(rows, columns)`.
        expected: (usize, usize),
        /// Actual `(rows, columns)`.
        got: (usize, usize),
    },

    /// A series operation failed.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// A statistics routine failed.
    #[error(transparent)]
    Stats(#[from] StatsError),
}
