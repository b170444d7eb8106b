//! Ordinary least squares.
//!
//! [`ols`] solves the normal equations and rejects collinear designs.
//! [`ols_rank_revealing`] orthogonalises the columns in order and drops
//! those that are numerically a combination of earlier ones.

use ndarray::{Array1, Array2};

use crate::error::StatsError;
use crate::linalg;

/// Result of an ordinary least-squares regression.
#[derive(Debug, Clone)]
pub struct OlsFit {
    params: Vec<f64>,
    bse: Vec<f64>,
    residuals: Vec<f64>,
    ssr: f64,
    nobs: usize,
    rank: usize,
}

/// Relative residual norm below which a column counts as a linear
/// combination of the columns before it.
const RANK_TOL: f64 = 1e-10;

impl OlsFit {
    /// Estimated coefficients, one per design column.
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Standard errors of the coefficients; NaN for dropped columns.
    pub fn bse(&self) -> &[f64] {
        &self.bse
    }

    /// t-statistics `params / bse`.
    pub fn tvalues(&self) -> Vec<f64> {
        self.params
            .iter()
            .zip(&self.bse)
            .map(|(b, se)| b / se)
            .collect()
    }

    /// Residuals `y - X b`.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Sum of squared residuals.
    pub fn ssr(&self) -> f64 {
        self.ssr
    }

    /// Number of observations.
    pub fn nobs(&self) -> usize {
        self.nobs
    }

    /// Number of linearly independent design columns.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of estimated coefficients (the design rank).
    pub fn k(&self) -> usize {
        self.rank
    }

    /// Gaussian log-likelihood at the ML variance `ssr / n`.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    /// `-2 llf + 2 k`.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.k() as f64
    }
}

/// Regresses `y` on the columns of `x` (no implicit intercept).
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::DimensionMismatch`] | `x.nrows() != y.len()` |
/// | [`StatsError::InsufficientData`] | fewer rows than columns + 1 |
/// | [`StatsError::SingularMatrix`] | collinear design |
pub fn ols(x: &Array2<f64>, y: &[f64]) -> Result<OlsFit, StatsError> {
    check_dims(x, y)?;
    let (n, k) = x.dim();

    let y = Array1::from(y.to_vec());
    let xtx = x.t().dot(x);
    let xty = x.t().dot(&y);
    let xtx_inv = linalg::invert(&xtx)?;
    let beta = xtx_inv.dot(&xty);

    let fitted = x.dot(&beta);
    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(a, b)| a - b).collect();
    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    let scale = ssr / (n - k) as f64;
    let bse = (0..k).map(|i| (xtx_inv[[i, i]] * scale).sqrt()).collect();

    Ok(OlsFit {
        params: beta.to_vec(),
        bse,
        residuals,
        ssr,
        nobs: n,
        rank: k,
    })
}

fn check_dims(x: &Array2<f64>, y: &[f64]) -> Result<(), StatsError> {
    let (n, k) = x.dim();
    if n != y.len() {
        return Err(StatsError::DimensionMismatch {
            expected: n,
            got: y.len(),
        });
    }
    if n <= k {
        return Err(StatsError::InsufficientData { n, min: k + 1 });
    }
    Ok(())
}

/// Regresses `y` on the columns of `x`, dropping columns that are (to
/// [`RANK_TOL`]) linear combinations of earlier columns.
///
/// Columns are orthogonalised left to right by Gram-Schmidt with one
/// reorthogonalisation pass, so earlier columns are always kept in
/// preference to later ones. Dropped columns get a zero coefficient and a
/// NaN standard error; the residual variance uses `n - rank` degrees of
/// freedom.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::DimensionMismatch`] | `x.nrows() != y.len()` |
/// | [`StatsError::InsufficientData`] | fewer rows than columns + 1 |
/// | [`StatsError::SingularMatrix`] | every column is zero, or a value is not finite |
pub fn ols_rank_revealing(x: &Array2<f64>, y: &[f64]) -> Result<OlsFit, StatsError> {
    check_dims(x, y)?;
    let (n, k) = x.dim();

    // Orthonormal basis of the kept columns and the triangular factor
    // `R` with `x[:, kept] = Q R`.
    let mut q: Vec<Array1<f64>> = Vec::with_capacity(k);
    let mut r = Array2::<f64>::zeros((k, k));
    let mut kept: Vec<usize> = Vec::with_capacity(k);
    for j in 0..k {
        let column = x.column(j);
        let norm0 = column.dot(&column).sqrt();
        if !norm0.is_finite() {
            return Err(StatsError::SingularMatrix);
        }
        if norm0 == 0.0 {
            continue;
        }
        let mut v = column.to_owned();
        let mut coefs = vec![0.0; q.len()];
        for _ in 0..2 {
            for (i, qi) in q.iter().enumerate() {
                let c = qi.dot(&v);
                v.scaled_add(-c, qi);
                coefs[i] += c;
            }
        }
        let norm = v.dot(&v).sqrt();
        if norm <= RANK_TOL * norm0 {
            continue;
        }
        let m = q.len();
        for (i, c) in coefs.into_iter().enumerate() {
            r[[i, m]] = c;
        }
        r[[m, m]] = norm;
        v.mapv_inplace(|e| e / norm);
        q.push(v);
        kept.push(j);
    }
    let rank = kept.len();
    if rank == 0 {
        return Err(StatsError::SingularMatrix);
    }

    // R⁻¹ by back substitution, column by column.
    let mut r_inv = Array2::<f64>::zeros((rank, rank));
    for col in 0..rank {
        for i in (0..=col).rev() {
            let e = if i == col { 1.0 } else { 0.0 };
            let s: f64 = (i + 1..=col).map(|l| r[[i, l]] * r_inv[[l, col]]).sum();
            r_inv[[i, col]] = (e - s) / r[[i, i]];
        }
    }

    let y = Array1::from(y.to_vec());
    let qty: Vec<f64> = q.iter().map(|qi| qi.dot(&y)).collect();
    let mut beta = Array1::<f64>::zeros(k);
    for (a, &j) in kept.iter().enumerate() {
        beta[j] = (a..rank).map(|b| r_inv[[a, b]] * qty[b]).sum();
    }

    let fitted = x.dot(&beta);
    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(a, b)| a - b).collect();
    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    let scale = ssr / (n - rank) as f64;

    // diag((RᵀR)⁻¹) = row sums of squares of R⁻¹
    let mut bse = vec![f64::NAN; k];
    for (a, &j) in kept.iter().enumerate() {
        let v: f64 = (a..rank).map(|b| r_inv[[a, b]].powi(2)).sum();
        bse[j] = (v * scale).sqrt();
    }

    Ok(OlsFit {
        params: beta.to_vec(),
        bse,
        residuals,
        ssr,
        nobs: n,
        rank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn exact_line() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let fit = ols(&x, &[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert_abs_diff_eq!(fit.params()[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.params()[1], 2.0, epsilon = 1e-10);
        assert!(fit.ssr() < 1e-18);
    }

    #[test]
    fn standard_errors_simple_regression() {
        // y = [1, 2, 2, 4], x = [0, 1, 2, 3]:
        // b1 = 0.9, b0 = 0.9, ssr = 0.7, s2 = 0.35, Sxx = 5
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let fit = ols(&x, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        assert_abs_diff_eq!(fit.params()[1], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.params()[0], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.ssr(), 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.bse()[1], (0.35_f64 / 5.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(fit.tvalues()[1], 0.9 / (0.07_f64).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn aic_matches_definition() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let fit = ols(&x, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        let n = 4.0_f64;
        let llf = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + (0.7 / n).ln() + 1.0);
        assert_abs_diff_eq!(fit.aic(), -2.0 * llf + 4.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_design() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        assert_eq!(ols(&x, &[1.0, 2.0, 3.0]).unwrap_err(), StatsError::SingularMatrix);
    }

    #[test]
    fn rank_revealing_matches_full_rank_ols() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let y = [1.0, 2.0, 2.0, 4.0];
        let a = ols(&x, &y).unwrap();
        let b = ols_rank_revealing(&x, &y).unwrap();
        assert_eq!(b.rank(), 2);
        for i in 0..2 {
            assert_abs_diff_eq!(a.params()[i], b.params()[i], epsilon = 1e-12);
            assert_abs_diff_eq!(a.bse()[i], b.bse()[i], epsilon = 1e-12);
        }
        assert_abs_diff_eq!(a.ssr(), b.ssr(), epsilon = 1e-12);
        assert_abs_diff_eq!(a.aic(), b.aic(), epsilon = 1e-10);
    }

    #[test]
    fn rank_revealing_drops_collinear_column() {
        // second column is twice the first
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let fit = ols_rank_revealing(&x, &[1.0, 2.0, 3.0, 4.5]).unwrap();
        assert_eq!(fit.rank(), 1);
        assert_eq!(fit.k(), 1);
        assert_abs_diff_eq!(fit.params()[0], 32.0 / 30.0, epsilon = 1e-12);
        assert_eq!(fit.params()[1], 0.0);
        assert!(fit.bse()[0].is_finite());
        assert!(fit.bse()[1].is_nan());
    }

    #[test]
    fn rank_revealing_keeps_earlier_duplicate() {
        // constant, slope, constant again
        let x = array![
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 2.0, 1.0],
            [1.0, 3.0, 1.0],
            [1.0, 4.0, 1.0]
        ];
        let fit = ols_rank_revealing(&x, &[1.0, 3.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(fit.rank(), 2);
        assert_abs_diff_eq!(fit.params()[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.params()[1], 2.0, epsilon = 1e-10);
        assert_eq!(fit.params()[2], 0.0);
        assert!(fit.ssr() < 1e-18);
    }

    #[test]
    fn rank_revealing_rejects_zero_design() {
        let x = Array2::zeros((4, 2));
        assert_eq!(
            ols_rank_revealing(&x, &[1.0, 2.0, 3.0, 4.0]).unwrap_err(),
            StatsError::SingularMatrix
        );
    }

    #[test]
    fn too_few_rows() {
        let x = array![[1.0, 2.0], [2.0, 5.0]];
        assert!(matches!(
            ols(&x, &[1.0, 2.0]),
            Err(StatsError::InsufficientData { n: 2, min: 3 })
        ));
    }
}
