//! Statistical helpers shared by the kairos crates.
//!
//! | Module | Description |
//! |--------|-------------|
//! | crate root | mean, variance, rolling moments, accuracy metrics |
//! | `correlogram` | ACF and Yule-Walker PACF |
//! | `ols` | Ordinary least squares with coefficient standard errors, plain and rank-revealing |
//! | `linalg` | Dense solves with singular-matrix detection |

mod correlogram;
mod error;
mod linalg;
mod ols;

pub use correlogram::{acf, pacf_yw, significance_bound};
pub use error::StatsError;
pub use linalg::{invert, solve};
pub use ols::{OlsFit, ols, ols_rank_revealing};

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n as f64 - 1.0)
}

/// Sample standard deviation with N-1 denominator.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Mean over each full window of `window` consecutive values.
///
/// Output position `i` covers `data[i..i + window]`, so the result has
/// `len - window + 1` values. Empty when `window` is 0 or exceeds `len`.
pub fn rolling_mean(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > data.len() {
        return Vec::new();
    }
    data.windows(window).map(mean).collect()
}

/// Sample standard deviation over each full window (N-1 denominator).
///
/// Same alignment as [`rolling_mean`].
pub fn rolling_sd(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > data.len() {
        return Vec::new();
    }
    data.windows(window).map(sd).collect()
}

/// Root mean squared error.
///
/// `None` when the slices are empty or differ in length.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>()
        / actual.len() as f64;
    Some(mse.sqrt())
}

/// Mean absolute error.
///
/// `None` when the slices are empty or differ in length.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum();
    Some(sum / actual.len() as f64)
}

/// Mean absolute percentage error, in percent.
///
/// `None` when the slices are empty, differ in length, or any actual value
/// is zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    if actual.iter().any(|&a| a == 0.0) {
        return None;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum();
    Some(100.0 * sum / actual.len() as f64)
}

fn paired(actual: &[f64], predicted: &[f64]) -> Option<()> {
    (!actual.is_empty() && actual.len() == predicted.len()).then_some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sd(&data), 2.138090, epsilon = 1e-6);
        assert_eq!(sd(&[5.0]), 0.0);
    }

    #[test]
    fn test_variance_two() {
        assert_relative_eq!(variance(&[3.0, 7.0]), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_mean() {
        let r = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(r, vec![2.0, 3.0, 4.0]);
        assert!(rolling_mean(&[1.0, 2.0], 3).is_empty());
        assert!(rolling_mean(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_rolling_sd() {
        let r = rolling_sd(&[1.0, 2.0, 3.0, 10.0], 2);
        assert_eq!(r.len(), 3);
        assert_relative_eq!(r[0], 0.5_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(r[2], 24.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_rmse_mae() {
        let a = [1.0, 2.0, 3.0];
        let p = [1.0, 4.0, 2.0];
        assert_relative_eq!(rmse(&a, &p).unwrap(), (5.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(mae(&a, &p).unwrap(), 1.0, epsilon = 1e-12);
        assert!(rmse(&a, &p[..2]).is_none());
        assert!(mae(&[], &[]).is_none());
    }

    #[test]
    fn test_mape() {
        let a = [100.0, 200.0];
        let p = [110.0, 180.0];
        assert_relative_eq!(mape(&a, &p).unwrap(), 10.0, epsilon = 1e-12);
        assert!(mape(&[0.0, 1.0], &[1.0, 1.0]).is_none());
    }
}
