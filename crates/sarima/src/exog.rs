//! Exogenous regressors.

use ndarray::{Array2, s};

use crate::error::SarimaError;

/// A matrix of exogenous regressors, one row per observation and one
/// named column per regressor.
///
/// ```
/// use kairos_sarima::Exog;
///
/// let exog = Exog::from_columns(vec![
///     ("temperature".to_string(), vec![10.0, 12.5, 11.0]),
///     ("holiday".to_string(), vec![0.0, 1.0, 0.0]),
/// ])?;
/// assert_eq!(exog.shape(), (3, 2));
/// # Ok::<(), kairos_sarima::SarimaError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Exog {
    names: Vec<String>,
    values: Array2<f64>,
}

impl Exog {
    /// Creates an exogenous matrix from column names and an `(n, k)` array.
    ///
    /// # Errors
    ///
    /// [`SarimaError::ExogShape`] if the number of names differs from the
    /// number of columns; [`SarimaError::NonFiniteData`] if any value is
    /// NaN or infinite.
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self, SarimaError> {
        let (rows, cols) = values.dim();
        if names.len() != cols {
            return Err(SarimaError::ExogShape {
                expected: (rows, names.len()),
                got: (rows, cols),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SarimaError::NonFiniteData);
        }
        Ok(Self { names, values })
    }

    /// Creates an exogenous matrix from named columns of equal length.
    ///
    /// # Errors
    ///
    /// [`SarimaError::ExogShape`] if the columns differ in length;
    /// [`SarimaError::NonFiniteData`] as for [`Exog::new`].
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self, SarimaError> {
        let rows = columns.first().map_or(0, |(_, c)| c.len());
        let cols = columns.len();
        let mut values = Array2::zeros((rows, cols));
        let mut names = Vec::with_capacity(cols);
        for (j, (name, column)) in columns.into_iter().enumerate() {
            if column.len() != rows {
                return Err(SarimaError::ExogShape {
                    expected: (rows, cols),
                    got: (column.len(), cols),
                });
            }
            for (i, v) in column.into_iter().enumerate() {
                values[[i, j]] = v;
            }
            names.push(name);
        }
        Self::new(names, values)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Rows `start..end` as a new matrix with the same column names.
    ///
    /// # Errors
    ///
    /// [`SarimaError::InvalidConfig`] if `start > end` or `end` runs past
    /// the last row.
    pub fn rows(&self, start: usize, end: usize) -> Result<Self, SarimaError> {
        if start > end || end > self.n_rows() {
            return Err(SarimaError::InvalidConfig {
                reason: format!(
                    "row range {start}..{end} is outside an exogenous matrix of {} rows",
                    self.n_rows()
                ),
            });
        }
        Ok(Self {
            names: self.names.clone(),
            values: self.values.slice(s![start..end, ..]).to_owned(),
        })
    }

    /// Splits off the last `k` rows: `(head, tail)`.
    pub fn split_tail(&self, k: usize) -> Result<(Self, Self), SarimaError> {
        let n = self.n_rows();
        let cut = n.checked_sub(k).ok_or(SarimaError::InvalidConfig {
            reason: format!("cannot split {k} rows off an exogenous matrix of {n} rows"),
        })?;
        Ok((self.rows(0, cut)?, self.rows(cut, n)?))
    }

    /// Column `j` as a contiguous vector.
    pub(crate) fn column(&self, j: usize) -> Vec<f64> {
        self.values.column(j).to_vec()
    }
}
