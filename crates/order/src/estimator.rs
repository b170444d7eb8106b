//! Correlogram-based order estimation.

use serde::Serialize;
use tracing::{debug, warn};

use kairos_series::Series;
use kairos_stats::{StatsError, acf, pacf_yw, significance_bound};

use crate::error::OrderError;

/// ACF and PACF up to `2 * seasonality` lags with the 95% bound.
///
/// Index `k` holds lag `k`; index 0 is always 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlogram {
    /// Biased sample autocorrelations.
    pub acf: Vec<f64>,
    /// Yule-Walker partial autocorrelations.
    pub pacf: Vec<f64>,
    /// `1.96 / sqrt(n)`.
    pub bound: f64,
}

/// Estimated `(p, q, P, Q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderEstimate {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal AR order.
    #[serde(rename = "P")]
    pub seasonal_p: usize,
    /// Seasonal MA order.
    #[serde(rename = "Q")]
    pub seasonal_q: usize,
}

impl OrderEstimate {
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.p, self.q, self.seasonal_p, self.seasonal_q)
    }
}

fn significant(value: f64, bound: f64) -> bool {
    value >= bound || value <= -bound
}

/// Number of consecutive significant lags starting at lag 1.
///
/// Counting stops at the first lag inside the bound; later significant lags
/// are ignored.
pub fn significant_run(values: &[f64], bound: f64) -> usize {
    values
        .iter()
        .skip(1)
        .take_while(|&&v| significant(v, bound))
        .count()
}

/// Seasonal order from the checkpoints at lags `s` and `2s`.
///
/// 0 when lag `s` is inside the bound, 2 when both lags are outside it,
/// 1 otherwise. Lags between the checkpoints are not consulted.
pub fn seasonal_terms(values: &[f64], bound: f64, seasonality: usize) -> usize {
    let at = |lag: usize| values.get(lag).is_some_and(|&v| significant(v, bound));
    match (at(seasonality), at(2 * seasonality)) {
        (false, _) => 0,
        (true, false) => 1,
        (true, true) => 2,
    }
}

/// Computes the correlogram used by [`estimate`].
pub fn correlogram(series: &Series, seasonality: usize) -> Result<Correlogram, OrderError> {
    if seasonality == 0 {
        return Err(OrderError::InvalidSeasonality);
    }
    let lags = 2 * seasonality;
    let n = series.len();
    if n <= lags {
        return Err(OrderError::InsufficientData {
            n,
            min: lags + 1,
            lags,
        });
    }
    let values = series.values();
    Ok(Correlogram {
        acf: acf(values, lags)?,
        pacf: pacf_yw(values, lags)?,
        bound: significance_bound(n),
    })
}

/// Estimates `(p, q, P, Q)` for a stationary series.
///
/// `p` and `q` are runs of significant PACF and ACF lags from lag 1;
/// `P` and `Q` come from the PACF and ACF at lags `s` and `2s` (see
/// [`significant_run`] and [`seasonal_terms`]).
///
/// A constant series has no correlation structure and yields all zeros.
///
/// # Errors
///
/// Returns [`OrderError::InsufficientData`] when the series has no more
/// than `2 * seasonality` observations and
/// [`OrderError::InvalidSeasonality`] when `seasonality` is zero.
#[tracing::instrument(skip(series), fields(n = series.len()))]
pub fn estimate(series: &Series, seasonality: usize) -> Result<OrderEstimate, OrderError> {
    let correlogram = match correlogram(series, seasonality) {
        Ok(c) => c,
        Err(OrderError::Stats(StatsError::ZeroVariance)) => {
            warn!("series is constant; no AR or MA terms estimated");
            return Ok(OrderEstimate {
                p: 0,
                q: 0,
                seasonal_p: 0,
                seasonal_q: 0,
            });
        }
        Err(e) => return Err(e),
    };
    let estimate = from_correlogram(&correlogram, seasonality);
    debug!(
        bound = correlogram.bound,
        p = estimate.p,
        q = estimate.q,
        seasonal_p = estimate.seasonal_p,
        seasonal_q = estimate.seasonal_q,
        "estimated orders"
    );
    Ok(estimate)
}

/// Applies the run and checkpoint rules to a precomputed correlogram.
pub fn from_correlogram(correlogram: &Correlogram, seasonality: usize) -> OrderEstimate {
    let b = correlogram.bound;
    OrderEstimate {
        p: significant_run(&correlogram.pacf, b),
        q: significant_run(&correlogram.acf, b),
        seasonal_p: seasonal_terms(&correlogram.pacf, b, seasonality),
        seasonal_q: seasonal_terms(&correlogram.acf, b, seasonality),
    }
}
