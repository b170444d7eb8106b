//! Single-model training with a fallback initialisation, and forecasting
//! onto a time index.

use chrono::NaiveDateTime;
use kairos_series::{Frequency, Series, SeriesError};
use tracing::{info, warn};

use crate::error::SarimaError;
use crate::exog::Exog;
use crate::fit::FittedModel;
use crate::forecast::{DEFAULT_LEVEL, Forecast};
use crate::kalman::Initialization;
use crate::options::FitOptions;
use crate::order::ModelOrder;
use crate::spec::SarimaSpec;

/// Configuration for [`train`] and [`forecast`].
///
/// # Example
///
/// ```
/// use kairos_sarima::{FitOptions, TrainConfig};
///
/// let config = TrainConfig::new()
///     .with_options(FitOptions::new().with_enforce_invertibility(true))
///     .with_level(0.9);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainConfig {
    /// Options of the first attempt; the retry only swaps the initialisation.
    options: FitOptions,
    /// Confidence level of forecast intervals.
    level: f64,
}

impl TrainConfig {
    /// Defaults: [`FitOptions::default()`] and a 95% confidence level.
    pub fn new() -> Self {
        Self {
            options: FitOptions::default(),
            level: DEFAULT_LEVEL,
        }
    }

    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Validates the fit options and the confidence level.
    pub fn validate(&self) -> Result<(), SarimaError> {
        self.options.validate()?;
        if !(self.level > 0.0 && self.level < 1.0) {
            return Err(SarimaError::InvalidConfig {
                reason: format!("confidence level must be in (0, 1), got {}", self.level),
            });
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `attempt` with the configured initialisation and, if that fails
/// with [`SarimaError::SingularMatrix`], once more with approximate diffuse
/// initialisation.
///
/// Any other first-attempt error is returned as is. A failed retry becomes
/// [`SarimaError::NonConvergence`].
fn with_fallback<T, F>(
    order: ModelOrder,
    first: Initialization,
    mut attempt: F,
) -> Result<T, SarimaError>
where
    F: FnMut(Initialization) -> Result<T, SarimaError>,
{
    match attempt(first) {
        Err(SarimaError::SingularMatrix) => {
            warn!(order = %order, "singular matrix during fit; retrying with diffuse initialisation");
            attempt(Initialization::ApproximateDiffuse).map_err(|e| SarimaError::NonConvergence {
                order,
                reason: e.to_string(),
            })
        }
        other => other,
    }
}

/// Fits one SARIMA model to a (level-transformed) series.
///
/// # Errors
///
/// Everything [`SarimaSpec::fit()`] returns, except that a singular-matrix
/// failure is retried once and, if the retry fails too, reported as
/// [`SarimaError::NonConvergence`].
#[tracing::instrument(skip(series, exog, config), fields(order = %order, n = series.len()))]
pub fn train(
    series: &Series,
    order: ModelOrder,
    exog: Option<&Exog>,
    config: &TrainConfig,
) -> Result<FittedModel, SarimaError> {
    config.validate()?;
    let model = with_fallback(order, config.options.initialization(), |init| {
        SarimaSpec::new(order)
            .with_options(config.options.with_initialization(init))
            .fit(series.values(), exog)
    })?;
    info!(
        order = %order,
        aic = model.aic(),
        initialization = ?model.initialization(),
        "model trained"
    );
    Ok(model)
}

/// A forecast aligned to the timestamps that follow the training data.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub mean: Series,
    pub lower: Series,
    pub upper: Series,
    pub level: f64,
}

impl ForecastSeries {
    fn from_forecast(index: Vec<NaiveDateTime>, f: &Forecast) -> Result<Self, SeriesError> {
        Ok(Self {
            mean: Series::new(index.clone(), f.mean().to_vec())?,
            lower: Series::new(index.clone(), f.lower().to_vec())?,
            upper: Series::new(index, f.upper().to_vec())?,
            level: f.level(),
        })
    }

    /// Applies a monotone map (e.g. `f64::exp_m1`) to all three series.
    pub fn map_values<F>(&self, f: F) -> Result<Self, SeriesError>
    where
        F: Fn(f64) -> f64,
    {
        Ok(Self {
            mean: self.mean.map_values(&f)?,
            lower: self.lower.map_values(&f)?,
            upper: self.upper.map_values(&f)?,
            level: self.level,
        })
    }
}

/// Forecasts `horizon` steps after `last` at the spacing of `frequency`.
///
/// # Errors
///
/// The forecast errors of [`FittedModel::forecast_with_level()`], and
/// [`SarimaError::Series`] if the index overflows or a value is not finite.
pub fn forecast(
    model: &FittedModel,
    last: NaiveDateTime,
    frequency: Frequency,
    horizon: usize,
    future_exog: Option<&Exog>,
    config: &TrainConfig,
) -> Result<ForecastSeries, SarimaError> {
    let f = model.forecast_with_level(horizon, future_exog, config.level)?;
    let index = frequency.future_index(last, horizon)?;
    Ok(ForecastSeries::from_forecast(index, &f)?)
}
