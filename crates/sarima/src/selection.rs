//! Grid search over seasonal ARIMA orders.
//!
//! Every `(p, q, P, Q)` combination is fitted independently (in parallel)
//! and only its criteria are kept; the winner is then picked by a
//! sequential pass in fixed iteration order, so the outcome does not depend
//! on which fit finishes first, and refitted once.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::SarimaError;
use crate::exog::Exog;
use crate::fit::{Criteria, FittedModel};
use crate::options::FitOptions;
use crate::order::ModelOrder;
use crate::spec::SarimaSpec;

/// Search space and fit options for [`grid_search`].
///
/// # Example
///
/// ```
/// use kairos_sarima::GridSearchConfig;
///
/// // d = 1, D = 1, s = 12, searching around p = 1, q = 0, P = 0, Q = 1.
/// let config = GridSearchConfig::new(1, 1, 12).around(1, 0, 0, 1);
/// assert_eq!(config.p_values(), &[0, 1, 2]);
/// assert_eq!(config.n_combinations(), 3 * 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchConfig {
    p_values: Vec<usize>,
    q_values: Vec<usize>,
    seasonal_p_values: Vec<usize>,
    seasonal_q_values: Vec<usize>,
    d: usize,
    seasonal_d: usize,
    s: usize,
    options: FitOptions,
}

impl GridSearchConfig {
    /// A grid with fixed differencing `(d, D)` and period `s`, and every
    /// free order set to `[0]`. Fit options default to no invertibility
    /// constraint.
    pub fn new(d: usize, seasonal_d: usize, s: usize) -> Self {
        Self {
            p_values: vec![0],
            q_values: vec![0],
            seasonal_p_values: vec![0],
            seasonal_q_values: vec![0],
            d,
            seasonal_d,
            s,
            options: FitOptions::default().with_enforce_invertibility(false),
        }
    }

    /// Sets every range to `0..=x + 1` around an estimated `(p, q, P, Q)`.
    pub fn around(self, p: usize, q: usize, seasonal_p: usize, seasonal_q: usize) -> Self {
        self.with_p_values((0..=p + 1).collect())
            .with_q_values((0..=q + 1).collect())
            .with_seasonal_p_values((0..=seasonal_p + 1).collect())
            .with_seasonal_q_values((0..=seasonal_q + 1).collect())
    }

    pub fn with_p_values(mut self, values: Vec<usize>) -> Self {
        self.p_values = values;
        self
    }

    pub fn with_q_values(mut self, values: Vec<usize>) -> Self {
        self.q_values = values;
        self
    }

    pub fn with_seasonal_p_values(mut self, values: Vec<usize>) -> Self {
        self.seasonal_p_values = values;
        self
    }

    pub fn with_seasonal_q_values(mut self, values: Vec<usize>) -> Self {
        self.seasonal_q_values = values;
        self
    }

    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn p_values(&self) -> &[usize] {
        &self.p_values
    }

    pub fn q_values(&self) -> &[usize] {
        &self.q_values
    }

    pub fn seasonal_p_values(&self) -> &[usize] {
        &self.seasonal_p_values
    }

    pub fn seasonal_q_values(&self) -> &[usize] {
        &self.seasonal_q_values
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn seasonal_d(&self) -> usize {
        self.seasonal_d
    }

    pub fn s(&self) -> usize {
        self.s
    }

    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Size of the Cartesian product.
    pub fn n_combinations(&self) -> usize {
        self.p_values.len()
            * self.q_values.len()
            * self.seasonal_p_values.len()
            * self.seasonal_q_values.len()
    }

    /// All orders in iteration order: `p` outermost, then `q`, `P`, `Q`.
    pub fn orders(&self) -> Vec<ModelOrder> {
        let mut out = Vec::with_capacity(self.n_combinations());
        for &p in &self.p_values {
            for &q in &self.q_values {
                for &sp in &self.seasonal_p_values {
                    for &sq in &self.seasonal_q_values {
                        out.push(
                            ModelOrder::new(p, self.d, q).with_seasonal(
                                sp,
                                self.seasonal_d,
                                sq,
                                self.s,
                            ),
                        );
                    }
                }
            }
        }
        out
    }

    pub fn validate(&self) -> Result<(), SarimaError> {
        self.options.validate()
    }
}

/// Running minima of the three criteria and the order that set them.
///
/// A candidate replaces the current best when at least two of
/// `aic ≤ best_aic`, `bic ≤ best_bic`, `hqic ≤ best_hqic` hold; ties count
/// as improvements. On acceptance all three minima are replaced by the
/// candidate's values, even the one that got worse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningBest {
    pub criteria: Criteria,
    pub order: Option<ModelOrder>,
}

impl Default for RunningBest {
    fn default() -> Self {
        Self {
            criteria: Criteria {
                aic: f64::INFINITY,
                bic: f64::INFINITY,
                hqic: f64::INFINITY,
            },
            order: None,
        }
    }
}

impl RunningBest {
    /// Offers a candidate and returns whether it became the new best.
    pub fn offer(&mut self, order: ModelOrder, candidate: &Criteria) -> bool {
        let best = &self.criteria;
        let votes = [
            candidate.aic <= best.aic,
            candidate.bic <= best.bic,
            candidate.hqic <= best.hqic,
        ]
        .into_iter()
        .filter(|&v| v)
        .count();
        if votes >= 2 {
            self.criteria = *candidate;
            self.order = Some(order);
            true
        } else {
            false
        }
    }
}

/// Result of one grid combination.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationResult {
    pub order: ModelOrder,
    pub outcome: Result<Criteria, SarimaError>,
}

/// Outcome of [`grid_search`].
#[derive(Debug, Clone)]
pub struct GridSearchOutcome {
    pub best_order: ModelOrder,
    /// Criteria of the best model when it was accepted.
    pub best_criteria: Criteria,
    pub best_model: FittedModel,
    /// Every combination, in iteration order.
    pub results: Vec<CombinationResult>,
    pub attempted: usize,
    pub failed: usize,
}

/// Fits every order of `config` to `data` and keeps the best by the
/// majority-of-three rule of [`RunningBest`].
///
/// `progress` is called with `(completed, total)` after each fit, from
/// worker threads. Setting `cancel` stops the search before the next fit.
///
/// Fitted models are dropped as soon as their criteria are read; the
/// winning order is refitted to produce [`GridSearchOutcome::best_model`].
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SarimaError::InvalidConfig`] | invalid fit options |
/// | [`SarimaError::Cancelled`] | `cancel` was set during the search |
/// | [`SarimaError::NoConvergentModel`] | the grid is empty or every fit failed |
/// | any fit error | the refit of the winning order fails |
#[tracing::instrument(skip_all, fields(n = data.len(), combinations = config.n_combinations()))]
pub fn grid_search<P>(
    data: &[f64],
    exog: Option<&Exog>,
    config: &GridSearchConfig,
    progress: P,
    cancel: Option<&AtomicBool>,
) -> Result<GridSearchOutcome, SarimaError>
where
    P: Fn(usize, usize) + Sync,
{
    config.validate()?;
    let orders = config.orders();
    let total = orders.len();
    let completed = AtomicUsize::new(0);
    let is_cancelled = || cancel.is_some_and(|c| c.load(Ordering::Relaxed));

    let fit = |order: ModelOrder| {
        SarimaSpec::new(order)
            .with_options(config.options)
            .fit(data, exog)
    };

    let scored: Vec<(ModelOrder, Result<Criteria, SarimaError>)> = orders
        .par_iter()
        .map(|&order| {
            if is_cancelled() {
                return (order, Err(SarimaError::Cancelled));
            }
            let result = fit(order).map(|model| model.criteria());
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress(done, total);
            (order, result)
        })
        .collect();

    if is_cancelled() {
        return Err(SarimaError::Cancelled);
    }

    let mut running = RunningBest::default();
    let mut results = Vec::with_capacity(total);
    let mut failed = 0;
    for (order, outcome) in scored {
        match &outcome {
            Ok(criteria) => {
                debug!(
                    order = %order,
                    aic = criteria.aic,
                    bic = criteria.bic,
                    hqic = criteria.hqic,
                    "combination fitted"
                );
                running.offer(order, criteria);
            }
            Err(e) => {
                warn!(order = %order, error = %e, "combination skipped");
                failed += 1;
            }
        }
        results.push(CombinationResult { order, outcome });
    }

    let Some(best_order) = running.order else {
        return Err(SarimaError::NoConvergentModel { attempted: total });
    };
    let best_model = fit(best_order)?;
    info!(
        best = %best_order,
        aic = running.criteria.aic,
        bic = running.criteria.bic,
        hqic = running.criteria.hqic,
        attempted = total,
        failed,
        "grid search finished"
    );
    Ok(GridSearchOutcome {
        best_order,
        best_criteria: running.criteria,
        best_model,
        results,
        attempted: total,
        failed,
    })
}
