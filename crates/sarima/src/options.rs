//! Estimation options for a single SARIMA fit.

use std::time::Duration;

use crate::error::SarimaError;
use crate::kalman::Initialization;

/// Options controlling one maximum-likelihood fit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use kairos_sarima::{FitOptions, Initialization};
///
/// let options = FitOptions::new()
///     .with_max_iters(500)
///     .with_timeout(Duration::from_secs(5))
///     .with_initialization(Initialization::ApproximateDiffuse);
///
/// assert!(options.validate().is_ok());
/// assert!(options.include_mean());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Nelder-Mead iteration cap.
    max_iters: u64,
    /// Convergence threshold on the standard deviation of simplex costs.
    sd_tolerance: f64,
    /// Wall-clock limit for the optimizer.
    timeout: Option<Duration>,
    /// Constrain MA polynomials to be invertible.
    enforce_invertibility: bool,
    /// Estimate an intercept (a drift once the model is differenced).
    include_mean: bool,
    /// Initial state covariance of the Kalman filter.
    initialization: Initialization,
}

impl FitOptions {
    /// Defaults: `max_iters = 2000`, `sd_tolerance = 1e-8`, no timeout,
    /// invertibility not enforced, intercept included, stationary
    /// initialisation.
    pub fn new() -> Self {
        Self {
            max_iters: 2000,
            sd_tolerance: 1e-8,
            timeout: None,
            enforce_invertibility: false,
            include_mean: true,
            initialization: Initialization::Stationary,
        }
    }

    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    /// Sets a per-fit time limit. A fit that exceeds it fails with
    /// [`SarimaError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_enforce_invertibility(mut self, enforce: bool) -> Self {
        self.enforce_invertibility = enforce;
        self
    }

    pub fn with_include_mean(mut self, include_mean: bool) -> Self {
        self.include_mean = include_mean;
        self
    }

    pub fn with_initialization(mut self, initialization: Initialization) -> Self {
        self.initialization = initialization;
        self
    }

    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn enforce_invertibility(&self) -> bool {
        self.enforce_invertibility
    }

    pub fn include_mean(&self) -> bool {
        self.include_mean
    }

    pub fn initialization(&self) -> Initialization {
        self.initialization
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `max_iters` is zero, `sd_tolerance` is not a
    /// positive finite number or the timeout is zero.
    pub fn validate(&self) -> Result<(), SarimaError> {
        if self.max_iters == 0 {
            return Err(SarimaError::InvalidConfig {
                reason: "max_iters must be at least 1".into(),
            });
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance <= 0.0 {
            return Err(SarimaError::InvalidConfig {
                reason: format!("sd_tolerance must be positive, got {}", self.sd_tolerance),
            });
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(SarimaError::InvalidConfig {
                reason: "timeout must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self::new()
    }
}
