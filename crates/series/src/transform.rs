//! Level transforms applied before differencing.

use std::fmt;

use crate::error::SeriesError;
use crate::series::Series;

/// Pointwise transform applied to the levels of a series.
///
/// [`LevelTransform::Log1p`] stabilises variance for non-negative data;
/// its inverse [`LevelTransform::invert`] is `expm1`, used to bring
/// forecasts back to the original scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelTransform {
    /// `x -> x`.
    #[default]
    Identity,
    /// `x -> ln(1 + x)`.
    Log1p,
}

impl LevelTransform {
    /// Transforms one value.
    pub fn forward(self, x: f64) -> f64 {
        match self {
            LevelTransform::Identity => x,
            LevelTransform::Log1p => x.ln_1p(),
        }
    }

    /// Inverts one value (`expm1` for [`LevelTransform::Log1p`]).
    pub fn invert(self, y: f64) -> f64 {
        match self {
            LevelTransform::Identity => y,
            LevelTransform::Log1p => y.exp_m1(),
        }
    }

    /// Inverts every value of a slice.
    pub fn invert_all(self, ys: &[f64]) -> Vec<f64> {
        ys.iter().map(|&y| self.invert(y)).collect()
    }

    /// Transforms every value of a series.
    ///
    /// # Errors
    ///
    /// [`SeriesError::NonFiniteData`] when a value is `<= -1` under
    /// [`LevelTransform::Log1p`].
    pub fn apply(self, series: &Series) -> Result<Series, SeriesError> {
        match self {
            LevelTransform::Identity => Ok(series.clone()),
            LevelTransform::Log1p => series.map_values(f64::ln_1p),
        }
    }

    /// Short name (`identity` or `log1p`).
    pub fn name(self) -> &'static str {
        match self {
            LevelTransform::Identity => "identity",
            LevelTransform::Log1p => "log1p",
        }
    }
}

impl fmt::Display for LevelTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
