//! Parameter vector layout and constraint transforms.
//!
//! The optimizer works on an unconstrained vector laid out as
//! `[φ (p), θ (q), Φ (P), Θ (Q)]`. AR blocks always pass through the PACF
//! transform so the fitted polynomials are stationary; MA blocks pass
//! through it only when invertibility is enforced.
//!
//! **Not part of the public API.**

use crate::order::ModelOrder;
use crate::polynomial;

/// Maps unconstrained values to the coefficients of a stationary
/// `1 - Σ φ_k B^k` (Jones 1980, Monahan 1984).
///
/// Step 1: `r_k = tanh(alpha_k)` maps each value to (-1, 1).
/// Step 2: Levinson-Durbin turns the partial autocorrelations into
///         polynomial coefficients.
pub(crate) fn unconstrained_to_coeffs(alpha: &[f64]) -> Vec<f64> {
    let p = alpha.len();
    if p == 0 {
        return Vec::new();
    }

    let r: Vec<f64> = alpha.iter().map(|a| a.tanh()).collect();

    let mut phi = vec![0.0; p];
    let mut prev = vec![0.0; p];
    phi[0] = r[0];
    for k in 1..p {
        prev.copy_from_slice(&phi);
        phi[k] = r[k];
        for j in 0..k {
            phi[j] = prev[j] - r[k] * prev[k - 1 - j];
        }
    }
    phi
}

/// AR and MA coefficients of one model, in model sign convention.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Coefficients {
    pub(crate) ar: Vec<f64>,
    pub(crate) ma: Vec<f64>,
    pub(crate) seasonal_ar: Vec<f64>,
    pub(crate) seasonal_ma: Vec<f64>,
}

impl Coefficients {
    /// Expanded `(φ(B)Φ(B^s), θ(B)Θ(B^s))` lag coefficients.
    pub(crate) fn expanded(&self, s: usize) -> (Vec<f64>, Vec<f64>) {
        (
            polynomial::expand_ar(&self.ar, &self.seasonal_ar, s),
            polynomial::expand_ma(&self.ma, &self.seasonal_ma, s),
        )
    }
}

/// How an unconstrained optimizer vector splits into coefficient blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParamLayout {
    p: usize,
    q: usize,
    seasonal_p: usize,
    seasonal_q: usize,
    enforce_invertibility: bool,
}

impl ParamLayout {
    pub(crate) fn new(order: &ModelOrder, enforce_invertibility: bool) -> Self {
        Self {
            p: order.p(),
            q: order.q(),
            seasonal_p: order.seasonal_p(),
            seasonal_q: order.seasonal_q(),
            enforce_invertibility,
        }
    }

    pub(crate) fn dim(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    fn ma_block(&self, raw: &[f64]) -> Vec<f64> {
        if self.enforce_invertibility {
            // 1 + Σθ B is invertible exactly when 1 - Σ(-θ) B is stationary.
            unconstrained_to_coeffs(raw).into_iter().map(|c| -c).collect()
        } else {
            raw.to_vec()
        }
    }

    /// Splits and transforms an optimizer vector of length [`dim`](Self::dim).
    pub(crate) fn unpack(&self, params: &[f64]) -> Coefficients {
        let (ar, rest) = params.split_at(self.p);
        let (ma, rest) = rest.split_at(self.q);
        let (sar, sma) = rest.split_at(self.seasonal_p);
        Coefficients {
            ar: unconstrained_to_coeffs(ar),
            ma: self.ma_block(ma),
            seasonal_ar: unconstrained_to_coeffs(sar),
            seasonal_ma: self.ma_block(sma),
        }
    }
}
