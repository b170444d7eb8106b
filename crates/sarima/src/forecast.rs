//! Out-of-sample forecasts with confidence intervals.
//!
//! Point forecasts come from iterating the filtered state of the ARMA
//! errors, adding the regression term and integrating the differences
//! back:
//!
//! ```text
//! w[n+h] = û[n+h] + μ + Σ β_j · (δ(B) x_j)[n+h]
//! y[n+h] = w[n+h] - Σ_{k≥1} δ_k · y[n+h-k]
//! ```
//!
//! The forecast error variance at step `h` is `σ² Σ_{j<h} ψ_j²`, with
//! `ψ` the weights of `θ(B)Θ(B^s) / (φ(B)Φ(B^s)δ(B))`.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::SarimaError;
use crate::exog::Exog;
use crate::fit::FittedModel;
use crate::polynomial;
use crate::state_space::StateSpace;

/// Default confidence level of forecast intervals.
pub const DEFAULT_LEVEL: f64 = 0.95;

/// Point forecasts with a symmetric confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    mean: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    std_err: Vec<f64>,
    level: f64,
}

impl Forecast {
    /// Point forecasts.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Lower interval bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper interval bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Forecast standard errors on the fitted scale.
    pub fn std_err(&self) -> &[f64] {
        &self.std_err
    }

    /// Confidence level of the interval, e.g. `0.95`.
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Applies a monotone map to the point forecasts and both bounds,
    /// e.g. `f64::exp_m1` to undo a `log1p` transform. Standard errors
    /// are left on the fitted scale.
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            mean: self.mean.iter().map(|&v| f(v)).collect(),
            lower: self.lower.iter().map(|&v| f(v)).collect(),
            upper: self.upper.iter().map(|&v| f(v)).collect(),
            std_err: self.std_err.clone(),
            level: self.level,
        }
    }
}

impl FittedModel {
    /// Forecasts `horizon` steps with a 95% interval.
    ///
    /// # Errors
    ///
    /// See [`FittedModel::forecast_with_level`].
    pub fn forecast(
        &self,
        horizon: usize,
        future_exog: Option<&Exog>,
    ) -> Result<Forecast, SarimaError> {
        self.forecast_with_level(horizon, future_exog, DEFAULT_LEVEL)
    }

    /// Forecasts `horizon` steps with an interval at confidence `level`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SarimaError::InvalidConfig`] | `horizon == 0` or `level` outside `(0, 1)` |
    /// | [`SarimaError::MissingFutureExog`] | the model has regressors and `future_exog` is `None` |
    /// | [`SarimaError::ExogShape`] | `future_exog` is not `horizon` rows by the fitted number of columns |
    pub fn forecast_with_level(
        &self,
        horizon: usize,
        future_exog: Option<&Exog>,
        level: f64,
    ) -> Result<Forecast, SarimaError> {
        if horizon == 0 {
            return Err(SarimaError::InvalidConfig {
                reason: "forecast horizon must be at least 1".into(),
            });
        }
        if !(level > 0.0 && level < 1.0) {
            return Err(SarimaError::InvalidConfig {
                reason: format!("confidence level must be in (0, 1), got {level}"),
            });
        }

        let order = self.order();
        let delta = polynomial::differencing(order.d(), order.seasonal_d(), order.s());
        let regression = self.future_regression(horizon, future_exog, &delta)?;

        // Error process forecasts from the filtered state.
        let (ar, ma) = self.coefficients.expanded(order.s());
        let ss = StateSpace::new(&ar, &ma);
        let mut state = self.next_state.clone();
        let mut w = Vec::with_capacity(horizon);
        for reg in regression {
            w.push(state[0] + reg);
            state = ss.predict_state(&state);
        }

        // Integrate back to the fitted scale.
        let mut history = self.data.clone();
        let mut mean = Vec::with_capacity(horizon);
        for wt in w {
            let t = history.len();
            let lagged: f64 = delta
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, c)| c * history[t - k])
                .sum();
            let y = wt - lagged;
            history.push(y);
            mean.push(y);
        }

        let psi = polynomial::psi_weights(&polynomial::integrated_ar(&ar, &delta), &ma, horizon);
        let mut cumulative = 0.0;
        let std_err: Vec<f64> = psi
            .iter()
            .map(|p| {
                cumulative += p * p;
                (self.sigma2 * cumulative).sqrt()
            })
            .collect();

        let normal = Normal::new(0.0, 1.0).map_err(|e| SarimaError::InvalidConfig {
            reason: e.to_string(),
        })?;
        let z = normal.inverse_cdf(0.5 + level / 2.0);
        let lower = mean.iter().zip(&std_err).map(|(m, se)| m - z * se).collect();
        let upper = mean.iter().zip(&std_err).map(|(m, se)| m + z * se).collect();

        Ok(Forecast {
            mean,
            lower,
            upper,
            std_err,
            level,
        })
    }

    /// Intercept plus regressor contribution for each future step of the
    /// differenced series.
    fn future_regression(
        &self,
        horizon: usize,
        future_exog: Option<&Exog>,
        delta: &[f64],
    ) -> Result<Vec<f64>, SarimaError> {
        let intercept = self.intercept().unwrap_or(0.0);
        let n_exog = self.exog_names.len();
        if n_exog == 0 {
            if let Some(exog) = future_exog {
                return Err(SarimaError::ExogShape {
                    expected: (horizon, 0),
                    got: exog.shape(),
                });
            }
            return Ok(vec![intercept; horizon]);
        }

        let exog = future_exog.ok_or(SarimaError::MissingFutureExog)?;
        if exog.shape() != (horizon, n_exog) {
            return Err(SarimaError::ExogShape {
                expected: (horizon, n_exog),
                got: exog.shape(),
            });
        }

        // Difference the regressors across the history/forecast boundary.
        let mut out = vec![intercept; horizon];
        for (j, beta) in self.exog_coefficients().iter().enumerate() {
            let mut column: Vec<f64> = self
                .exog_tail
                .as_ref()
                .map(|t| t.column(j).to_vec())
                .unwrap_or_default();
            column.extend(exog.column(j));
            for (o, x) in out.iter_mut().zip(polynomial::apply(delta, &column)) {
                *o += beta * x;
            }
        }
        Ok(out)
    }
}
