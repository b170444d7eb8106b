//! Fitted seasonal ARIMA model.

use std::fmt::Write as _;

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::kalman::Initialization;
use crate::order::ModelOrder;
use crate::params::Coefficients;

/// Information criteria of a fitted model (lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Criteria {
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
}

impl Criteria {
    /// Computes AIC, BIC and HQIC from a log-likelihood, `k` estimated
    /// parameters and `n` observations.
    pub fn from_log_likelihood(log_likelihood: f64, k: usize, n: usize) -> Self {
        let (k, n) = (k as f64, n as f64);
        Self {
            aic: -2.0 * log_likelihood + 2.0 * k,
            bic: -2.0 * log_likelihood + k * n.ln(),
            hqic: -2.0 * log_likelihood + 2.0 * k * n.ln().ln(),
        }
    }
}

/// A fitted SARIMA model produced by [`SarimaSpec::fit()`].
///
/// Holds the estimated coefficients, regression terms and innovation
/// variance together with the filter state needed to forecast.
///
/// ```mermaid
/// graph LR
///     B["FittedModel"] --> C[".criteria(): AIC, BIC, HQIC"]
///     B --> D[".residuals() / .fitted_values()"]
///     B --> E[".forecast(horizon, exog)"]
///     B --> F[".summary()"]
/// ```
///
/// [`SarimaSpec::fit()`]: crate::SarimaSpec::fit
#[derive(Clone, Debug)]
pub struct FittedModel {
    pub(crate) order: ModelOrder,
    pub(crate) coefficients: Coefficients,
    pub(crate) include_mean: bool,
    /// `[intercept?, exog...]`.
    pub(crate) regression: Vec<f64>,
    pub(crate) exog_names: Vec<String>,
    pub(crate) sigma2: f64,
    pub(crate) log_likelihood: f64,
    pub(crate) nobs: usize,
    pub(crate) residuals: Vec<f64>,
    /// Training series on the scale the model was fitted on.
    pub(crate) data: Vec<f64>,
    /// Last `d + s·D` rows of the training regressors.
    pub(crate) exog_tail: Option<Array2<f64>>,
    pub(crate) next_state: Array1<f64>,
    pub(crate) initialization: Initialization,
    pub(crate) iterations: u64,
    pub(crate) converged: bool,
}

impl FittedModel {
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// Non-seasonal AR coefficients `φ`.
    pub fn ar(&self) -> &[f64] {
        &self.coefficients.ar
    }

    /// Non-seasonal MA coefficients `θ`.
    pub fn ma(&self) -> &[f64] {
        &self.coefficients.ma
    }

    /// Seasonal AR coefficients `Φ`.
    pub fn seasonal_ar(&self) -> &[f64] {
        &self.coefficients.seasonal_ar
    }

    /// Seasonal MA coefficients `Θ`.
    pub fn seasonal_ma(&self) -> &[f64] {
        &self.coefficients.seasonal_ma
    }

    /// Intercept of the differenced series, if one was estimated.
    pub fn intercept(&self) -> Option<f64> {
        self.include_mean.then(|| self.regression[0])
    }

    /// Coefficients of the exogenous regressors, in column order.
    pub fn exog_coefficients(&self) -> &[f64] {
        &self.regression[usize::from(self.include_mean)..]
    }

    pub fn exog_names(&self) -> &[String] {
        &self.exog_names
    }

    pub fn has_exog(&self) -> bool {
        !self.exog_names.is_empty()
    }

    /// Innovation variance `σ²`.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Maximised log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Observations that entered the likelihood.
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    /// Number of estimated parameters: ARMA coefficients, regression
    /// coefficients and `σ²`.
    pub fn n_params(&self) -> usize {
        self.order.n_arma_params() + self.regression.len() + 1
    }

    pub fn criteria(&self) -> Criteria {
        Criteria::from_log_likelihood(self.log_likelihood, self.n_params(), self.nobs)
    }

    pub fn aic(&self) -> f64 {
        self.criteria().aic
    }

    pub fn bic(&self) -> f64 {
        self.criteria().bic
    }

    pub fn hqic(&self) -> f64 {
        self.criteria().hqic
    }

    /// One-step-ahead prediction errors of the differenced series.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// In-sample one-step-ahead predictions on the fitted scale, aligned
    /// with the last `residuals().len()` training observations.
    pub fn fitted_values(&self) -> Vec<f64> {
        let start = self.data.len() - self.residuals.len();
        self.data[start..]
            .iter()
            .zip(&self.residuals)
            .map(|(y, v)| y - v)
            .collect()
    }

    /// Initialisation the final likelihood evaluation used.
    pub fn initialization(&self) -> Initialization {
        self.initialization
    }

    /// Optimizer iterations spent.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// `false` when the optimizer stopped at its iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Named parameter estimates, in the order
    /// `ar.L*, ma.L*, ar.S.L*, ma.S.L*, intercept, exog..., sigma2`.
    pub fn params(&self) -> Vec<(String, f64)> {
        let s = self.order.s();
        let mut out = Vec::with_capacity(self.n_params());
        for (i, &c) in self.ar().iter().enumerate() {
            out.push((format!("ar.L{}", i + 1), c));
        }
        for (i, &c) in self.ma().iter().enumerate() {
            out.push((format!("ma.L{}", i + 1), c));
        }
        for (i, &c) in self.seasonal_ar().iter().enumerate() {
            out.push((format!("ar.S.L{}", s * (i + 1)), c));
        }
        for (i, &c) in self.seasonal_ma().iter().enumerate() {
            out.push((format!("ma.S.L{}", s * (i + 1)), c));
        }
        if let Some(c) = self.intercept() {
            out.push(("intercept".to_string(), c));
        }
        for (name, &c) in self.exog_names.iter().zip(self.exog_coefficients()) {
            out.push((name.clone(), c));
        }
        out.push(("sigma2".to_string(), self.sigma2));
        out
    }

    /// Plain-text summary: order, estimates and fit statistics.
    pub fn summary(&self) -> String {
        let c = self.criteria();
        let rule = "=".repeat(48);
        let thin = "-".repeat(48);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:<24}{:>24}", "Model:", self.order.to_string());
        let _ = writeln!(out, "{:<24}{:>24}", "No. observations:", self.nobs);
        let _ = writeln!(out, "{:<24}{:>24.4}", "Log likelihood:", self.log_likelihood);
        let _ = writeln!(out, "{:<24}{:>24.4}", "AIC:", c.aic);
        let _ = writeln!(out, "{:<24}{:>24.4}", "BIC:", c.bic);
        let _ = writeln!(out, "{:<24}{:>24.4}", "HQIC:", c.hqic);
        let _ = writeln!(out, "{:<24}{:>24}", "Converged:", self.converged);
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "{:<24}{:>24}", "parameter", "estimate");
        let _ = writeln!(out, "{thin}");
        for (name, value) in self.params() {
            let _ = writeln!(out, "{name:<24}{value:>24.6}");
        }
        let _ = write!(out, "{rule}");
        out
    }
}
