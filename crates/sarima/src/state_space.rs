//! State-space form of a (seasonal) ARMA error process.
//!
//! The expanded polynomials `φ(B)Φ(B^s)` and `θ(B)Θ(B^s)` give an
//! ARMA(p*, q*) process written as:
//!
//! ```text
//! x[t+1] = T * x[t] + R * e[t]     (state transition)
//! u[t]   = Z' * x[t]                (observation, Z = e1)
//! ```
//!
//! with `T` in companion form (AR coefficients in the first column, ones
//! on the super-diagonal), `R = [1, θ*_1, ..., θ*_q*, 0, ...]` and
//! `e[t] ~ N(0, σ²)`. Covariances are kept in units of `σ²`.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2, Axis};

use crate::error::SarimaError;

/// Maximum number of doubling steps for the stationary covariance.
const MAX_DOUBLINGS: usize = 64;

#[derive(Clone, Debug)]
pub(crate) struct StateSpace {
    r: usize,
    ar: Vec<f64>,
    t: Array2<f64>,
    r_vec: Array1<f64>,
    rrt: Array2<f64>,
}

impl StateSpace {
    /// Builds the companion form from expanded AR and MA lag coefficients.
    pub(crate) fn new(ar: &[f64], ma: &[f64]) -> Self {
        let r = ar.len().max(ma.len() + 1).max(1);

        let mut ar_padded = vec![0.0; r];
        ar_padded[..ar.len()].copy_from_slice(ar);

        let mut t = Array2::zeros((r, r));
        for (i, &a) in ar_padded.iter().enumerate() {
            t[[i, 0]] = a;
        }
        for i in 0..r - 1 {
            t[[i, i + 1]] = 1.0;
        }

        let mut r_vec = Array1::zeros(r);
        r_vec[0] = 1.0;
        for (j, &m) in ma.iter().enumerate() {
            r_vec[j + 1] = m;
        }

        let r_col = r_vec.view().insert_axis(Axis(1));
        let r_row = r_vec.view().insert_axis(Axis(0));
        let rrt = r_col.dot(&r_row);

        Self {
            r,
            ar: ar_padded,
            t,
            r_vec,
            rrt,
        }
    }

    /// State dimension `r = max(p*, q* + 1)`, minimum 1.
    pub(crate) fn r(&self) -> usize {
        self.r
    }

    #[cfg(test)]
    pub(crate) fn t(&self) -> &Array2<f64> {
        &self.t
    }

    #[cfg(test)]
    pub(crate) fn r_vec(&self) -> &Array1<f64> {
        &self.r_vec
    }

    /// `T·a`, using the companion structure.
    pub(crate) fn predict_state(&self, a: &Array1<f64>) -> Array1<f64> {
        let a0 = a[0];
        Array1::from_shape_fn(self.r, |i| {
            let shifted = if i + 1 < self.r { a[i + 1] } else { 0.0 };
            self.ar[i] * a0 + shifted
        })
    }

    /// `T·P·Tᵀ + R·Rᵀ` in `O(r²)`, using the companion structure.
    pub(crate) fn predict_cov(&self, p: &Array2<f64>) -> Array2<f64> {
        let r = self.r;
        let p00 = p[[0, 0]];
        let at = |i: usize, j: usize| if i < r && j < r { p[[i, j]] } else { 0.0 };
        Array2::from_shape_fn((r, r), |(i, j)| {
            let (ai, aj) = (self.ar[i], self.ar[j]);
            ai * aj * p00
                + ai * at(0, j + 1)
                + aj * at(i + 1, 0)
                + at(i + 1, j + 1)
                + self.rrt[[i, j]]
        })
    }

    /// Unconditional state covariance: the solution of `P = T·P·Tᵀ + R·Rᵀ`.
    ///
    /// Uses the doubling iteration `P ← P + A·P·Aᵀ`, `A ← A²`, which
    /// converges when every root of the AR polynomial lies outside the
    /// unit circle.
    ///
    /// # Errors
    ///
    /// [`SarimaError::SingularMatrix`] if the iteration does not converge
    /// or produces non-finite values.
    pub(crate) fn stationary_cov(&self) -> Result<Array2<f64>, SarimaError> {
        let mut p = self.rrt.clone();
        let mut a = self.t.clone();
        for _ in 0..MAX_DOUBLINGS {
            let inc = a.dot(&p).dot(&a.t());
            p += &inc;
            let step = inc.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            let scale = p.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
            if !step.is_finite() || !scale.is_finite() {
                return Err(SarimaError::SingularMatrix);
            }
            if step <= 1e-12 * scale {
                return Ok(p);
            }
            a = a.dot(&a);
        }
        Err(SarimaError::SingularMatrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ar1_layout() {
        let ss = StateSpace::new(&[0.5], &[]);
        assert_eq!(ss.r(), 1);
        assert_abs_diff_eq!(ss.t()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.r_vec()[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn arma21_layout() {
        let ss = StateSpace::new(&[0.5, -0.3], &[0.4]);
        assert_eq!(ss.r(), 2);
        // T = [[0.5, 1.0], [-0.3, 0.0]]
        assert_abs_diff_eq!(ss.t()[[0, 0]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.t()[[0, 1]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.t()[[1, 0]], -0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.t()[[1, 1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ss.r_vec()[1], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn seasonal_ma_widens_state() {
        // θ(B)Θ(B^4) with q = Q = 1 has degree 5.
        let ma = crate::polynomial::expand_ma(&[0.3], &[0.5], 4);
        let ss = StateSpace::new(&[], &ma);
        assert_eq!(ss.r(), 6);
        assert_abs_diff_eq!(ss.r_vec()[5], 0.15, epsilon = 1e-12);
    }

    #[test]
    fn white_noise_is_one_dimensional() {
        let ss = StateSpace::new(&[], &[]);
        assert_eq!(ss.r(), 1);
        let p = ss.stationary_cov().unwrap();
        assert_abs_diff_eq!(p[[0, 0]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn ar1_stationary_variance() {
        let ss = StateSpace::new(&[0.6], &[]);
        let p = ss.stationary_cov().unwrap();
        assert_abs_diff_eq!(p[[0, 0]], 1.0 / (1.0 - 0.36), epsilon = 1e-10);
    }

    #[test]
    fn ma1_stationary_variance() {
        let ss = StateSpace::new(&[], &[0.5]);
        let p = ss.stationary_cov().unwrap();
        assert_abs_diff_eq!(p[[0, 0]], 1.25, epsilon = 1e-12);
        assert_abs_diff_eq!(p[[0, 1]], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p[[1, 1]], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn stationary_cov_is_a_fixed_point() {
        let ss = StateSpace::new(&[0.5, -0.2], &[0.4, 0.1]);
        let p = ss.stationary_cov().unwrap();
        let next = ss.predict_cov(&p);
        for (a, b) in p.iter().zip(next.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn unit_root_does_not_converge() {
        let ss = StateSpace::new(&[1.0], &[]);
        assert_eq!(ss.stationary_cov(), Err(SarimaError::SingularMatrix));
    }

    #[test]
    fn companion_prediction_matches_dense_product() {
        let ss = StateSpace::new(&[0.5, -0.3, 0.1], &[0.4]);
        let p = Array2::from_shape_fn((3, 3), |(i, j)| 1.0 / (1.0 + i as f64 + j as f64));
        let fast = ss.predict_cov(&p);
        let dense = ss.t().dot(&p).dot(&ss.t().t()) + &ss.rrt;
        for (a, b) in fast.iter().zip(dense.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }

        let a = Array1::from(vec![1.0, 2.0, 3.0]);
        let fast = ss.predict_state(&a);
        let dense = ss.t().dot(&a);
        for (x, y) in fast.iter().zip(dense.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
        }
    }
}
