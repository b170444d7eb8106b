//! Lag-polynomial algebra.
//!
//! Full polynomials are stored as `[c0, c1, ..., ck]` meaning
//! `c0 + c1·B + ... + ck·B^k`. AR and MA coefficient lists are stored
//! without the leading one, in the sign convention of the model:
//!
//! ```text
//! AR:  1 - a1·B - a2·B² - ...     (a = [a1, a2, ...])
//! MA:  1 + b1·B + b2·B² + ...     (b = [b1, b2, ...])
//! ```
//!
//! **Not part of the public API.**

/// Product of two full polynomials.
pub(crate) fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Full polynomial `1 + sign·(c1·B^step + c2·B^(2·step) + ...)`.
fn lag_poly(coeffs: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coeffs.len() * step + 1];
    poly[0] = 1.0;
    for (j, &c) in coeffs.iter().enumerate() {
        poly[(j + 1) * step] = sign * c;
    }
    poly
}

/// Drops the leading one and flips back to coefficient-list sign.
fn strip(poly: &[f64], sign: f64) -> Vec<f64> {
    let mut coeffs: Vec<f64> = poly.iter().skip(1).map(|c| sign * c).collect();
    while coeffs.last() == Some(&0.0) {
        coeffs.pop();
    }
    coeffs
}

/// Expanded AR lag coefficients of `φ(B)Φ(B^s)`.
pub(crate) fn expand_ar(ar: &[f64], seasonal_ar: &[f64], s: usize) -> Vec<f64> {
    let poly = mul(&lag_poly(ar, 1, -1.0), &lag_poly(seasonal_ar, s.max(1), -1.0));
    strip(&poly, -1.0)
}

/// Expanded MA lag coefficients of `θ(B)Θ(B^s)`.
pub(crate) fn expand_ma(ma: &[f64], seasonal_ma: &[f64], s: usize) -> Vec<f64> {
    let poly = mul(&lag_poly(ma, 1, 1.0), &lag_poly(seasonal_ma, s.max(1), 1.0));
    strip(&poly, 1.0)
}

/// Full polynomial `(1 - B)^d (1 - B^s)^D`.
pub(crate) fn differencing(d: usize, seasonal_d: usize, s: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = mul(&poly, &[1.0, -1.0]);
    }
    if seasonal_d > 0 {
        let mut seasonal = vec![0.0; s + 1];
        seasonal[0] = 1.0;
        seasonal[s] = -1.0;
        for _ in 0..seasonal_d {
            poly = mul(&poly, &seasonal);
        }
    }
    poly
}

/// Applies a full polynomial as a filter: `w[t] = Σ c_k·x[t+K-k]`.
///
/// The output has `x.len() - K` values, where `K = poly.len() - 1`.
pub(crate) fn apply(poly: &[f64], x: &[f64]) -> Vec<f64> {
    let k = poly.len().saturating_sub(1);
    if x.len() <= k {
        return Vec::new();
    }
    (k..x.len())
        .map(|t| poly.iter().enumerate().map(|(j, c)| c * x[t - j]).sum::<f64>())
        .collect()
}

/// AR lag coefficients of the integrated model, `φ(B)Φ(B^s)·δ(B)`.
pub(crate) fn integrated_ar(ar_expanded: &[f64], delta: &[f64]) -> Vec<f64> {
    let poly = mul(&lag_poly(ar_expanded, 1, -1.0), delta);
    strip(&poly, -1.0)
}

/// First `n` ψ-weights of `(1 - Σ a_i B^i)⁻¹ (1 + Σ b_j B^j)`.
pub(crate) fn psi_weights(ar: &[f64], ma: &[f64], n: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(n);
    for j in 0..n {
        let mut v = if j == 0 {
            1.0
        } else {
            ma.get(j - 1).copied().unwrap_or(0.0)
        };
        for (i, a) in ar.iter().enumerate().take(j) {
            v += a * psi[j - 1 - i];
        }
        psi.push(v);
    }
    psi
}
