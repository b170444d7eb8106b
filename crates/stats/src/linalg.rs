//! Dense Gauss-Jordan solves with partial pivoting.
//!
//! Systems here are small (regression designs with a handful of columns),
//! so a direct elimination is enough. A pivot below `1e-12` relative to the
//! largest entry of the matrix is treated as singular.

use ndarray::{Array1, Array2};

use crate::error::StatsError;

const PIVOT_TOL: f64 = 1e-12;

/// Reduces `[a | rhs]` in place to `[I | a⁻¹ rhs]`.
fn gauss_jordan(a: &mut Array2<f64>, rhs: &mut Array2<f64>) -> Result<(), StatsError> {
    let n = a.nrows();
    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Err(StatsError::SingularMatrix);
    }

    for col in 0..n {
        let (pivot_row, pivot_abs) = (col..n)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if pivot_abs <= PIVOT_TOL * scale {
            return Err(StatsError::SingularMatrix);
        }
        if pivot_row != col {
            for j in 0..n {
                a.swap([col, j], [pivot_row, j]);
            }
            for j in 0..rhs.ncols() {
                rhs.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = a[[col, col]];
        for j in 0..n {
            a[[col, j]] /= pivot;
        }
        for j in 0..rhs.ncols() {
            rhs[[col, j]] /= pivot;
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = a[[r, col]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                let v = a[[col, j]];
                a[[r, j]] -= factor * v;
            }
            for j in 0..rhs.ncols() {
                let v = rhs[[col, j]];
                rhs[[r, j]] -= factor * v;
            }
        }
    }
    Ok(())
}

fn check_square(a: &Array2<f64>) -> Result<(), StatsError> {
    if a.nrows() != a.ncols() {
        return Err(StatsError::DimensionMismatch {
            expected: a.nrows(),
            got: a.ncols(),
        });
    }
    Ok(())
}

/// Solves `a x = b`.
///
/// # Errors
///
/// [`StatsError::SingularMatrix`] when `a` is (numerically) singular and
/// [`StatsError::DimensionMismatch`] for non-square `a` or a wrong-length `b`.
pub fn solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, StatsError> {
    check_square(a)?;
    if b.len() != a.nrows() {
        return Err(StatsError::DimensionMismatch {
            expected: a.nrows(),
            got: b.len(),
        });
    }
    let mut work = a.clone();
    let mut rhs = b.clone().insert_axis(ndarray::Axis(1));
    gauss_jordan(&mut work, &mut rhs)?;
    Ok(rhs.column(0).to_owned())
}

/// Inverts a square matrix.
///
/// # Errors
///
/// As [`solve`].
pub fn invert(a: &Array2<f64>) -> Result<Array2<f64>, StatsError> {
    check_square(a)?;
    let mut work = a.clone();
    let mut inv = Array2::eye(a.nrows());
    gauss_jordan(&mut work, &mut inv)?;
    Ok(inv)
}
