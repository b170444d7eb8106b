//! Sample autocorrelation and partial autocorrelation.

use crate::error::StatsError;

/// Two-sided 95% significance bound `1.96 / sqrt(n)` for correlogram values.
pub fn significance_bound(n: usize) -> f64 {
    1.96 / (n.max(1) as f64).sqrt()
}

/// Demeaned autocovariances at lags `0..=nlags`.
///
/// `adjusted = false` divides every lag by `n`; `adjusted = true` divides
/// lag `k` by `n - k`.
fn autocovariances(x: &[f64], nlags: usize, adjusted: bool) -> Result<Vec<f64>, StatsError> {
    let n = x.len();
    if n <= nlags {
        return Err(StatsError::InsufficientData { n, min: nlags + 1 });
    }
    let m = crate::mean(x);
    let centered: Vec<f64> = x.iter().map(|v| v - m).collect();
    let acov: Vec<f64> = (0..=nlags)
        .map(|k| {
            let s: f64 = centered[k..]
                .iter()
                .zip(&centered[..n - k])
                .map(|(a, b)| a * b)
                .sum();
            let denom = if adjusted { n - k } else { n };
            s / denom as f64
        })
        .collect();
    let scale = x.iter().fold(0.0_f64, |a, v| a.max(v.abs()));
    if acov[0] <= (1e-10 * scale).powi(2) {
        return Err(StatsError::ZeroVariance);
    }
    Ok(acov)
}

/// Sample autocorrelation function at lags `0..=nlags`.
///
/// Uses the biased (`1/n`) autocovariance estimator, so `acf[0] == 1` and
/// every value lies in `[-1, 1]`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::InsufficientData`] | `x.len() <= nlags` |
/// | [`StatsError::ZeroVariance`] | `x` is constant |
pub fn acf(x: &[f64], nlags: usize) -> Result<Vec<f64>, StatsError> {
    let acov = autocovariances(x, nlags, false)?;
    let c0 = acov[0];
    Ok(acov.into_iter().map(|c| c / c0).collect())
}

/// Partial autocorrelation function at lags `0..=nlags` from the
/// Yule-Walker equations with `1/(n-k)` adjusted autocovariances.
///
/// Lag `k` is the last coefficient of the order-`k` Yule-Walker fit,
/// computed for all lags at once with the Durbin-Levinson recursion.
/// `pacf[0] == 1`.
///
/// # Errors
///
/// As [`acf`], plus [`StatsError::NotPositiveDefinite`] when the adjusted
/// autocovariance sequence stops being positive definite.
pub fn pacf_yw(x: &[f64], nlags: usize) -> Result<Vec<f64>, StatsError> {
    let acov = autocovariances(x, nlags, true)?;
    let r: Vec<f64> = acov.iter().map(|c| c / acov[0]).collect();

    let mut out = Vec::with_capacity(nlags + 1);
    out.push(1.0);
    if nlags == 0 {
        return Ok(out);
    }

    let mut phi = vec![0.0; nlags + 1];
    let mut prev = vec![0.0; nlags + 1];
    let mut v = 1.0;
    for k in 1..=nlags {
        let acc: f64 = (1..k).map(|j| prev[j] * r[k - j]).sum();
        let kk = (r[k] - acc) / v;
        phi[k] = kk;
        for j in 1..k {
            phi[j] = prev[j] - kk * prev[k - j];
        }
        v *= 1.0 - kk * kk;
        if v.is_nan() || v <= 0.0 || !kk.is_finite() {
            return Err(StatsError::NotPositiveDefinite { lag: k });
        }
        out.push(kk);
        prev[..=k].copy_from_slice(&phi[..=k]);
    }
    Ok(out)
}
