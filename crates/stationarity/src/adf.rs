//! Augmented Dickey-Fuller unit-root test.
//!
//! Test regression with a constant:
//!
//! ```text
//! Δy[t] = α + γ·y[t-1] + Σ_{j=1..L} δ_j·Δy[t-j] + ε[t]
//! ```
//!
//! `L` is chosen by AIC over `0..=maxlag` on a common sample, then the
//! regression is refitted with `L` lags on its own (longer) sample. The
//! statistic is the t-value of `γ`.
//!
//! Lagged differences that are numerically collinear with earlier columns
//! are dropped from the least-squares fit, so smooth series still get a
//! statistic. Two degenerate inputs get a definite one instead:
//!
//! | Input | Statistic |
//! |-------|-----------|
//! | constant series | `-inf` (trivially stationary) |
//! | exact fit, `γ < 0` | `-inf` |
//! | exact fit, `γ ≈ 0` | `0` (unit root not rejected) |
//! | exact fit, `γ > 0` | `+inf` |

use ndarray::Array2;
use tracing::trace;

use kairos_stats::ols_rank_revealing;

use crate::error::StationarityError;
use crate::mackinnon::{self, CriticalValues};

/// Smallest series the test accepts (`maxlag = n/2 - 2` must be non-negative).
pub const MIN_OBSERVATIONS: usize = 4;

/// Spread relative to magnitude below which a series is constant.
const CONSTANT_TOL: f64 = 1e-12;

/// `ssr / Σ Δy²` below which the test regression fits exactly.
const EXACT_FIT_TOL: f64 = 1e-16;

/// `|γ|` below which an exact fit shows no mean reversion.
const GAMMA_TOL: f64 = 1e-8;

/// Outcome of an Augmented Dickey-Fuller test.
#[derive(Debug, Clone, PartialEq)]
pub struct AdfResult {
    statistic: f64,
    p_value: f64,
    used_lag: usize,
    n_obs: usize,
    critical_values: CriticalValues,
    ic_best: f64,
}

impl AdfResult {
    /// t-statistic of the lagged level coefficient.
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    /// MacKinnon approximate p-value.
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    /// Number of lagged differences selected by AIC.
    pub fn used_lag(&self) -> usize {
        self.used_lag
    }

    /// Observations in the final regression.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Critical values at 1%, 5% and 10%.
    pub fn critical_values(&self) -> CriticalValues {
        self.critical_values
    }

    /// Best AIC reached during lag selection.
    pub fn ic_best(&self) -> f64 {
        self.ic_best
    }

    /// `true` when the unit-root null is rejected at the 1% level.
    pub fn rejects_at_1pct(&self) -> bool {
        self.statistic < self.critical_values.one_pct
    }
}

/// Default maximum lag `ceil(12 (n/100)^(1/4))`, capped at `n/2 - 2`.
fn default_maxlag(n: usize) -> Result<usize, StationarityError> {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as i64;
    let cap = (n / 2) as i64 - 2;
    let maxlag = schwert.min(cap);
    if maxlag < 0 {
        return Err(StationarityError::InsufficientData {
            n,
            min: MIN_OBSERVATIONS,
        });
    }
    Ok(maxlag as usize)
}

/// Builds the regression for `lags` lagged differences on the sample that
/// starts after `sample_lag` differences, i.e. rows `t = sample_lag..` of
/// the differenced series.
///
/// Column layout: `[level, Δlag_1, .., Δlag_lags]` followed by a constant
/// column when `constant_last`, or preceded by one otherwise.
fn design(
    x: &[f64],
    dx: &[f64],
    sample_lag: usize,
    lags: usize,
    constant_last: bool,
) -> (Array2<f64>, Vec<f64>) {
    let rows = dx.len() - sample_lag;
    let cols = lags + 2;
    let offset = usize::from(!constant_last);
    let const_col = if constant_last { cols - 1 } else { 0 };

    let mut m = Array2::zeros((rows, cols));
    let mut y = Vec::with_capacity(rows);
    for (row, t) in (sample_lag..dx.len()).enumerate() {
        m[[row, const_col]] = 1.0;
        m[[row, offset]] = x[t];
        for j in 1..=lags {
            m[[row, offset + j]] = dx[t - j];
        }
        y.push(dx[t]);
    }
    (m, y)
}

fn is_constant(x: &[f64]) -> bool {
    let (lo, hi) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    hi - lo <= CONSTANT_TOL * lo.abs().max(hi.abs())
}

fn exact_fit_statistic(gamma: f64) -> f64 {
    if gamma < -GAMMA_TOL {
        f64::NEG_INFINITY
    } else if gamma > GAMMA_TOL {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Runs the constant-only Augmented Dickey-Fuller test with AIC lag
/// selection.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StationarityError::InsufficientData`] | fewer than [`MIN_OBSERVATIONS`] values |
/// | [`StationarityError::DegenerateRegression`] | the statistic is NaN |
/// | [`StationarityError::Stats`] | non-finite regressors |
pub fn adfuller(x: &[f64]) -> Result<AdfResult, StationarityError> {
    let n = x.len();
    let maxlag = default_maxlag(n)?;

    if is_constant(x) {
        trace!(n, "constant series is trivially stationary");
        let n_obs = n - 1;
        return Ok(AdfResult {
            statistic: f64::NEG_INFINITY,
            p_value: 0.0,
            used_lag: 0,
            n_obs,
            critical_values: mackinnon::critical_values(n_obs),
            ic_best: f64::NEG_INFINITY,
        });
    }

    let dx: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // Lag selection on the common sample.
    let (full, y_common) = design(x, &dx, maxlag, maxlag, false);
    let mut best: Option<(f64, usize)> = None;
    for lags in 0..=maxlag {
        let cols = full.slice(ndarray::s![.., ..lags + 2]).to_owned();
        let fit = ols_rank_revealing(&cols, &y_common)?;
        let aic = fit.aic();
        trace!(lags, aic, rank = fit.rank(), "adf lag candidate");
        // Strict comparison keeps the smaller lag on ties.
        if best.is_none_or(|(b, _)| aic < b) {
            best = Some((aic, lags));
        }
    }
    let (ic_best, used_lag) = best.ok_or(StationarityError::InsufficientData {
        n,
        min: MIN_OBSERVATIONS,
    })?;

    let (m, y) = design(x, &dx, used_lag, used_lag, true);
    let fit = ols_rank_revealing(&m, &y)?;
    let tss: f64 = y.iter().map(|v| v * v).sum();
    let statistic = if fit.ssr() <= EXACT_FIT_TOL * tss.max(f64::MIN_POSITIVE) {
        exact_fit_statistic(fit.params()[0])
    } else {
        fit.tvalues()[0]
    };
    if statistic.is_nan() {
        return Err(StationarityError::DegenerateRegression);
    }
    let n_obs = y.len();

    Ok(AdfResult {
        statistic,
        p_value: mackinnon::p_value(statistic),
        used_lag,
        n_obs,
        critical_values: mackinnon::critical_values(n_obs),
        ic_best,
    })
}
