//! Kalman filter for the exact Gaussian likelihood.
//!
//! Runs the prediction error decomposition over the state-space form in
//! [`crate::state_space`] with `σ²` concentrated out:
//!
//! ```text
//! σ̂² = (1/m) Σ v_t² / F_t
//! ℓ  = -m/2 · (ln 2π + ln σ̂² + 1) - 1/2 · Σ ln F_t
//! ```
//!
//! where `v_t` are the one-step prediction errors and `F_t` their variances
//! in units of `σ²`. `m` counts the observations that enter the likelihood.
//!
//! **Not part of the public API.**

use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::error::SarimaError;
use crate::state_space::StateSpace;

/// Variance given to every state under approximate diffuse initialisation.
pub(crate) const DIFFUSE_KAPPA: f64 = 1e6;

/// How the filter's initial state covariance is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Initialization {
    /// Unconditional covariance of the stationary process.
    #[default]
    Stationary,
    /// `κ·I` with large `κ`; the first `r` observations only serve to
    /// settle the state and are left out of the likelihood.
    ApproximateDiffuse,
}

#[derive(Debug, Clone)]
pub(crate) struct KalmanOutput {
    pub(crate) log_likelihood: f64,
    pub(crate) sigma2: f64,
    /// One-step prediction errors `v_t` for every observation.
    pub(crate) innovations: Vec<f64>,
    /// Observations entering the likelihood.
    pub(crate) nobs: usize,
    /// Predicted state `a[n+1|n]` after the last observation.
    pub(crate) next_state: Array1<f64>,
}

fn initial_cov(ss: &StateSpace, init: Initialization) -> Result<Array2<f64>, SarimaError> {
    match init {
        Initialization::Stationary => ss.stationary_cov(),
        Initialization::ApproximateDiffuse => {
            Ok(Array2::eye(ss.r()) * DIFFUSE_KAPPA)
        }
    }
}

fn burn_in(ss: &StateSpace, init: Initialization) -> usize {
    match init {
        Initialization::Stationary => 0,
        Initialization::ApproximateDiffuse => ss.r(),
    }
}

/// Filters `data` and returns the concentrated log-likelihood together
/// with innovations and the final predicted state.
///
/// # Errors
///
/// [`SarimaError::SingularMatrix`] when the initial covariance cannot be
/// computed or a prediction variance is not positive;
/// [`SarimaError::InsufficientData`] when no observation is left after the
/// diffuse burn-in.
pub(crate) fn filter(
    ss: &StateSpace,
    data: &[f64],
    init: Initialization,
) -> Result<KalmanOutput, SarimaError> {
    let burn = burn_in(ss, init);
    if data.len() <= burn {
        return Err(SarimaError::InsufficientData {
            n: data.len(),
            min: burn + 1,
        });
    }

    let r = ss.r();
    let mut a = Array1::zeros(r);
    let mut p = initial_cov(ss, init)?;

    let mut innovations = Vec::with_capacity(data.len());
    let mut sum_sq = 0.0;
    let mut sum_log_f = 0.0;

    for (t, &y) in data.iter().enumerate() {
        let f = p[[0, 0]];
        if !f.is_finite() || f <= 0.0 {
            return Err(SarimaError::SingularMatrix);
        }
        let v = y - a[0];
        innovations.push(v);
        if t >= burn {
            sum_sq += v * v / f;
            sum_log_f += f.ln();
        }

        // Update with the observation, then predict the next state.
        let gain = p.column(0).to_owned() / f;
        a = a + &gain * v;
        let p0 = p.row(0).to_owned();
        for i in 0..r {
            for j in 0..r {
                p[[i, j]] -= gain[i] * p0[j];
            }
        }
        a = ss.predict_state(&a);
        p = ss.predict_cov(&p);
    }

    let m = data.len() - burn;
    let sigma2 = sum_sq / m as f64;
    if !sigma2.is_finite() || sigma2 <= 0.0 {
        return Err(SarimaError::SingularMatrix);
    }
    let mf = m as f64;
    let log_likelihood = -0.5 * mf * ((2.0 * PI).ln() + sigma2.ln() + 1.0) - 0.5 * sum_log_f;

    Ok(KalmanOutput {
        log_likelihood,
        sigma2,
        innovations,
        nobs: m,
        next_state: a,
    })
}
