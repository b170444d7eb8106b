//! Error types for the kairos-stats crate.

/// Error type for the fallible routines of kairos-stats.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when there are fewer observations than the routine needs.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations provided.
        n: usize,
        /// Minimum number required.
        min: usize,
    },

    /// Returned when the input has zero variance.
    #[error("input data is constant (zero variance)")]
    ZeroVariance,

    /// Returned when a linear system has no unique solution.
    #[error("singular matrix")]
    SingularMatrix,

    /// Returned when matrix and vector dimensions do not agree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when the Durbin-Levinson recursion loses positive definiteness.
    #[error("autocovariances are not positive definite at lag {lag}")]
    NotPositiveDefinite {
        /// Lag at which the prediction-error variance became non-positive.
        lag: usize,
    },
}
