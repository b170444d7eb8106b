//! Nelder-Mead optimizer for SARIMA maximum-likelihood estimation.
//!
//! Wraps the `argmin` crate to minimize the negative concentrated
//! log-likelihood over the unconstrained parameter vector of
//! [`crate::params::ParamLayout`].
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use ndarray::{Array2, s};
use tracing::{debug, warn};

use crate::error::SarimaError;
use crate::exog::Exog;
use crate::fit::FittedModel;
use crate::kalman::{self, Initialization};
use crate::options::FitOptions;
use crate::order::ModelOrder;
use crate::params::ParamLayout;
use crate::polynomial;
use crate::state_space::StateSpace;

/// Spread of the initial simplex around the origin.
const SIMPLEX_STEP: f64 = 0.5;

/// Differenced series split into a regression part and the ARMA errors.
struct Regression {
    /// `[intercept?, exog...]`.
    beta: Vec<f64>,
    /// `w - X·β`, the input to the Kalman filter.
    errors: Vec<f64>,
}

/// Regresses the differenced series on an intercept and the differenced
/// regressors.
fn regress(
    w: &[f64],
    delta: &[f64],
    exog: Option<&Exog>,
    include_mean: bool,
) -> Result<Regression, SarimaError> {
    let n = w.len();
    let n_exog = exog.map_or(0, Exog::n_cols);
    let k = usize::from(include_mean) + n_exog;
    if k == 0 {
        return Ok(Regression {
            beta: Vec::new(),
            errors: w.to_vec(),
        });
    }

    let mut x = Array2::zeros((n, k));
    if include_mean {
        x.column_mut(0).fill(1.0);
    }
    if let Some(exog) = exog {
        let offset = usize::from(include_mean);
        for j in 0..n_exog {
            let xd = polynomial::apply(delta, &exog.column(j));
            for (i, v) in xd.into_iter().enumerate() {
                x[[i, offset + j]] = v;
            }
        }
    }
    let fit = kairos_stats::ols(&x, w)?;
    Ok(Regression {
        beta: fit.params().to_vec(),
        errors: fit.residuals().to_vec(),
    })
}

fn is_constant(errors: &[f64], w: &[f64]) -> bool {
    let scale = w.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
    let (lo, hi) = errors
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    hi - lo <= 1e-10 * scale
}

/// Fits a SARIMA model to `data` via exact MLE.
///
/// 1. Validate order, options and data
/// 2. Difference with `(1 - B)^d (1 - B^s)^D`
/// 3. Estimate the intercept and regressor coefficients by OLS
/// 4. Optimize the concentrated log-likelihood of the errors via Nelder-Mead
/// 5. Run a final Kalman pass at the optimum
pub(crate) fn fit_sarima(
    order: ModelOrder,
    data: &[f64],
    exog: Option<&Exog>,
    options: &FitOptions,
) -> Result<FittedModel, SarimaError> {
    // 1. Validate
    order.validate()?;
    options.validate()?;
    if data.is_empty() {
        return Err(SarimaError::EmptyData);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(SarimaError::NonFiniteData);
    }
    if let Some(exog) = exog
        && exog.n_rows() != data.len()
    {
        return Err(SarimaError::ExogShape {
            expected: (data.len(), exog.n_cols()),
            got: exog.shape(),
        });
    }

    // 2. Difference
    let k_diff = order.n_differenced();
    let delta = polynomial::differencing(order.d(), order.seasonal_d(), order.s());
    let w = polynomial::apply(&delta, data);
    let state_dim = order.ar_degree().max(order.ma_degree() + 1);
    let min_obs = state_dim + 1;
    if w.len() < min_obs {
        return Err(SarimaError::InsufficientData {
            n: w.len(),
            min: min_obs,
        });
    }

    // 3. Regression
    let Regression { beta, errors } = regress(&w, &delta, exog, options.include_mean())?;
    if is_constant(&errors, &w) {
        return Err(SarimaError::ConstantData);
    }

    // 4. Optimize
    let layout = ParamLayout::new(&order, options.enforce_invertibility());
    let init = options.initialization();
    let (best, iterations, converged) = if layout.dim() == 0 {
        // White-noise errors: nothing to optimize.
        (Vec::new(), 0, true)
    } else {
        optimize(order, &layout, &errors, init, options)?
    };

    // 5. Final Kalman pass
    let coefficients = layout.unpack(&best);
    let (ar, ma) = coefficients.expanded(order.s());
    let ss = StateSpace::new(&ar, &ma);
    let output = kalman::filter(&ss, &errors, init)?;

    debug!(
        order = %order,
        log_likelihood = output.log_likelihood,
        sigma2 = output.sigma2,
        iterations,
        "model fitted"
    );

    let exog_tail = exog.map(|e| {
        let rows = e.n_rows();
        e.values().slice(s![rows - k_diff.., ..]).to_owned()
    });

    Ok(FittedModel {
        order,
        coefficients,
        include_mean: options.include_mean(),
        regression: beta,
        exog_names: exog.map(|e| e.names().to_vec()).unwrap_or_default(),
        sigma2: output.sigma2,
        log_likelihood: output.log_likelihood,
        nobs: output.nobs,
        residuals: output.innovations,
        data: data.to_vec(),
        exog_tail,
        next_state: output.next_state,
        initialization: init,
        iterations,
        converged,
    })
}

/// Runs Nelder-Mead and returns `(best parameters, iterations, converged)`.
fn optimize(
    order: ModelOrder,
    layout: &ParamLayout,
    errors: &[f64],
    init: Initialization,
    options: &FitOptions,
) -> Result<(Vec<f64>, u64, bool), SarimaError> {
    let dim = layout.dim();
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(vec![0.0; dim]);
    for i in 0..dim {
        let mut vertex = vec![0.0; dim];
        vertex[i] = SIMPLEX_STEP;
        simplex.push(vertex);
    }

    let cost = SarimaCost {
        data: errors,
        layout,
        s: order.s(),
        init,
    };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(options.sd_tolerance())
        .map_err(|e| SarimaError::Optimization {
            reason: e.to_string(),
        })?;

    let max_iters = options.max_iters();
    let mut executor = Executor::new(cost, solver).configure(|state| state.max_iters(max_iters));
    if let Some(limit) = options.timeout() {
        executor = executor.timeout(limit);
    }
    let result = executor.run().map_err(|e| SarimaError::Optimization {
        reason: e.to_string(),
    })?;

    let state = result.state();
    let converged = match &state.termination_status {
        TerminationStatus::Terminated(TerminationReason::Timeout) => {
            let limit = options.timeout().unwrap_or_default();
            return Err(SarimaError::Timeout { limit });
        }
        TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
            warn!(order = %order, max_iters, "optimizer reached its iteration cap; using best parameters so far");
            false
        }
        _ => true,
    };
    let best = state
        .best_param
        .clone()
        .ok_or_else(|| SarimaError::Optimization {
            reason: "optimizer returned no parameters".into(),
        })?;
    Ok((best, state.iter, converged))
}

/// Cost function for argmin: negative concentrated log-likelihood.
struct SarimaCost<'a> {
    data: &'a [f64],
    layout: &'a ParamLayout,
    s: usize,
    init: Initialization,
}

impl CostFunction for SarimaCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let (ar, ma) = self.layout.unpack(params).expanded(self.s);
        let ss = StateSpace::new(&ar, &ma);

        match kalman::filter(&ss, self.data, self.init) {
            Ok(out) if out.log_likelihood.is_finite() => Ok(-out.log_likelihood),
            _ => Ok(f64::MAX),
        }
    }
}
