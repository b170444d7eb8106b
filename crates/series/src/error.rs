//! Error types for the kairos-series crate.

/// Error type for all fallible operations in the kairos-series crate.
///
/// Covers construction-time validation of the time axis and values, and
/// length requirements of derived series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series would contain no observations.
    #[error("series is empty")]
    Empty,

    /// Returned when the index and value vectors differ in length.
    #[error("length mismatch: {index} timestamps, {values} values")]
    LengthMismatch {
        /// Number of timestamps.
        index: usize,
        /// Number of values.
        values: usize,
    },

    /// Returned when the index is not a valid, strictly increasing time axis.
    #[error("invalid time axis: {reason}")]
    DataFormat {
        /// Description of the offending timestamps.
        reason: String,
    },

    /// Returned when a value is NaN or infinite.
    #[error("non-finite value at position {position}")]
    NonFiniteData {
        /// Zero-based position of the first offending value.
        position: usize,
    },

    /// Returned when an operation needs more observations than available.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations available.
        n: usize,
        /// Minimum number required.
        min: usize,
    },

    /// Returned when a split would leave an empty train or test part.
    #[error("invalid split: cannot hold out {test} of {n} observations")]
    InvalidSplit {
        /// Requested test size.
        test: usize,
        /// Series length.
        n: usize,
    },

    /// Returned when a frequency label is not recognised.
    #[error("unknown frequency: {name:?} (expected hourly, daily, monthly, quarterly or yearly)")]
    UnknownFrequency {
        /// The label that failed to parse.
        name: String,
    },

    /// Returned when stepping the calendar leaves chrono's supported range.
    #[error("timestamp out of range after {steps} step(s)")]
    TimestampOverflow {
        /// Number of steps that were requested.
        steps: usize,
    },
}
