//! Error types for the kairos-order crate.

use kairos_stats::StatsError;

/// Error type for order estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    /// Returned when the series is too short for `2 * seasonality` lags.
    #[error(
        "insufficient data: got {n} observations, need at least {min} \
         for a correlogram of {lags} lags"
    )]
    InsufficientData {
        /// Number of observations available.
        n: usize,
        /// Minimum number required.
        min: usize,
        /// Number of lags requested.
        lags: usize,
    },

    /// Returned when the seasonality is zero.
    #[error("seasonality must be at least 1")]
    InvalidSeasonality,

    /// A correlogram computation failed.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_insufficient_data() {
        let err = OrderError::InsufficientData {
            n: 20,
            min: 25,
            lags: 24,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: got 20 observations, need at least 25 for a correlogram of 24 lags"
        );
    }

    #[test]
    fn error_invalid_seasonality() {
        assert_eq!(
            OrderError::InvalidSeasonality.to_string(),
            "seasonality must be at least 1"
        );
    }

    #[test]
    fn error_stats_is_transparent() {
        let err: OrderError = StatsError::SingularMatrix.into();
        assert_eq!(err.to_string(), StatsError::SingularMatrix.to_string());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OrderError>();
    }
}
