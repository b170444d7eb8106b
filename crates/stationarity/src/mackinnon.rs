//! MacKinnon approximate p-values and critical values for the
//! Dickey-Fuller statistic with a constant and one integrated variable.
//!
//! p-values: MacKinnon (1994) response surfaces.
//! Critical values: MacKinnon (2010) finite-sample response surfaces.

use statrs::function::erf::erfc;

/// Above this statistic the p-value is 1.
const TAU_MAX: f64 = 2.74;
/// Below this statistic the p-value is 0.
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials.
const TAU_STAR: f64 = -1.61;

const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// `[1%, 5%, 10%]` rows of `b0 + b1/n + b2/n² + b3/n³`.
const CRIT_2010: [[f64; 4]; 3] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-2.86154, -2.8903, -4.234, -40.040],
    [-2.56677, -1.5384, -2.809, 0.0],
];

/// Critical values of the Dickey-Fuller statistic at 1%, 5% and 10%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    /// 1% critical value.
    pub one_pct: f64,
    /// 5% critical value.
    pub five_pct: f64,
    /// 10% critical value.
    pub ten_pct: f64,
}

impl CriticalValues {
    /// `(label, value)` pairs in the conventional `"1%"`, `"5%"`, `"10%"` order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("1%", self.one_pct),
            ("5%", self.five_pct),
            ("10%", self.ten_pct),
        ]
    }
}

/// Evaluates `c[0] + c[1] x + c[2] x² + ...`.
fn polyval(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Approximate p-value of a Dickey-Fuller statistic.
pub fn p_value(stat: f64) -> f64 {
    if stat > TAU_MAX {
        return 1.0;
    }
    if stat < TAU_MIN {
        return 0.0;
    }
    let z = if stat <= TAU_STAR {
        polyval(&SMALL_P, stat)
    } else {
        polyval(&LARGE_P, stat)
    };
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Finite-sample critical values for `nobs` regression observations.
pub fn critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs.max(1) as f64;
    let at = |row: &[f64; 4]| polyval(row, inv);
    CriticalValues {
        one_pct: at(&CRIT_2010[0]),
        five_pct: at(&CRIT_2010[1]),
        ten_pct: at(&CRIT_2010[2]),
    }
}
