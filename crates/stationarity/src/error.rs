//! Error types for the kairos-stationarity crate.

use kairos_series::SeriesError;
use kairos_stats::StatsError;

use crate::candidate::CandidateKind;

/// Error type for all fallible operations in the kairos-stationarity crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StationarityError {
    /// Wraps a series construction or differencing failure.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Wraps a regression failure inside the unit-root test.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Returned when the series is too short for the unit-root regression.
    #[error(
        "insufficient data for the unit-root test: got {n} observations, need at least {min}; \
         try smaller AR/MA terms or a shorter seasonal period"
    )]
    InsufficientData {
        /// Number of observations available.
        n: usize,
        /// Minimum number required.
        min: usize,
    },

    /// Returned when the test regression yields no usable statistic.
    #[error("unit-root regression is degenerate (undefined test statistic)")]
    DegenerateRegression,

    /// Returned when a custom difference is forced without `(d, D)`.
    #[error("{kind} requires explicit difference sizes (d, D)")]
    MissingParameter {
        /// The candidate that needs parameters.
        kind: CandidateKind,
    },

    /// Returned when the seasonal period is zero.
    #[error("seasonality must be at least 1")]
    InvalidSeasonality,

    /// Returned when a candidate name is not recognised.
    #[error("unknown transformation: {name:?}")]
    UnknownCandidate {
        /// The name that failed to parse.
        name: String,
    },
}
