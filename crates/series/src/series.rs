//! Validated timestamp-indexed series.

use chrono::NaiveDateTime;

use crate::error::SeriesError;

/// An immutable univariate time series.
///
/// Invariants, checked by [`Series::new`]:
/// - at least one observation,
/// - one timestamp per value,
/// - timestamps strictly increasing (no duplicates),
/// - every value finite.
///
/// All derived series (differences, transforms, splits) are new values.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    index: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl Series {
    /// Creates a series after validating its invariants.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SeriesError::Empty`] | no observations |
    /// | [`SeriesError::LengthMismatch`] | `index.len() != values.len()` |
    /// | [`SeriesError::DataFormat`] | duplicate or decreasing timestamps |
    /// | [`SeriesError::NonFiniteData`] | a NaN or infinite value |
    pub fn new(index: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if index.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                index: index.len(),
                values: values.len(),
            });
        }
        if values.is_empty() {
            return Err(SeriesError::Empty);
        }
        for w in index.windows(2) {
            if w[1] == w[0] {
                return Err(SeriesError::DataFormat {
                    reason: format!("duplicate timestamp {}", w[0]),
                });
            }
            if w[1] < w[0] {
                return Err(SeriesError::DataFormat {
                    reason: format!("timestamp {} follows later timestamp {}", w[1], w[0]),
                });
            }
        }
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFiniteData { position });
        }
        Ok(Self { index, values })
    }

    /// Number of observations (always at least 1).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamps, strictly increasing.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Observed values, aligned with [`Series::index`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First timestamp.
    pub fn first_timestamp(&self) -> NaiveDateTime {
        self.index[0]
    }

    /// Last timestamp.
    pub fn last_timestamp(&self) -> NaiveDateTime {
        self.index[self.index.len() - 1]
    }

    /// Lag-`lag` difference `y[t] - y[t - lag]`.
    ///
    /// The first `lag` positions are undefined and dropped, so the result
    /// has `len - lag` observations indexed by the later timestamps.
    /// `diff(0)` returns an unchanged copy.
    ///
    /// # Errors
    ///
    /// [`SeriesError::InsufficientData`] when `len <= lag`.
    pub fn diff(&self, lag: usize) -> Result<Series, SeriesError> {
        if lag == 0 {
            return Ok(self.clone());
        }
        if self.len() <= lag {
            return Err(SeriesError::InsufficientData {
                n: self.len(),
                min: lag + 1,
            });
        }
        let values = self
            .values
            .iter()
            .skip(lag)
            .zip(self.values.iter())
            .map(|(later, earlier)| later - earlier)
            .collect();
        Ok(Series {
            index: self.index[lag..].to_vec(),
            values,
        })
    }

    /// Applies [`Series::diff`] with lag `lag`, `times` times in sequence.
    pub fn diff_n(&self, lag: usize, times: usize) -> Result<Series, SeriesError> {
        let mut out = self.clone();
        for _ in 0..times {
            out = out.diff(lag)?;
        }
        Ok(out)
    }

    /// Maps every value through `f`, keeping the index.
    ///
    /// # Errors
    ///
    /// [`SeriesError::NonFiniteData`] when `f` produces NaN or infinity.
    pub fn map_values<F>(&self, f: F) -> Result<Series, SeriesError>
    where
        F: Fn(f64) -> f64,
    {
        Series::new(self.index.clone(), self.values.iter().map(|&v| f(v)).collect())
    }

    /// Splits into `(train, test)`, the test part holding the last `test`
    /// observations.
    ///
    /// # Errors
    ///
    /// [`SeriesError::InvalidSplit`] when either part would be empty.
    pub fn split_tail(&self, test: usize) -> Result<(Series, Series), SeriesError> {
        let n = self.len();
        if test == 0 || test >= n {
            return Err(SeriesError::InvalidSplit { test, n });
        }
        let cut = n - test;
        Ok((
            Series {
                index: self.index[..cut].to_vec(),
                values: self.values[..cut].to_vec(),
            },
            Series {
                index: self.index[cut..].to_vec(),
                values: self.values[cut..].to_vec(),
            },
        ))
    }

    /// The last `k` observations (the whole series when `k >= len`).
    pub fn tail(&self, k: usize) -> Series {
        let start = self.len().saturating_sub(k.max(1));
        Series {
            index: self.index[start..].to_vec(),
            values: self.values[start..].to_vec(),
        }
    }
}
