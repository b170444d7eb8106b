//! Candidate transformations and their test outcomes.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use kairos_series::{LevelTransform, Series};

use crate::adf::AdfResult;
use crate::error::StationarityError;

/// The transformations the selector can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    /// The raw series.
    Absolute,
    /// `y[t] - y[t-1]`.
    FirstDifference,
    /// `ln(1 + y[t])`.
    LogTransform,
    /// `y[t] - y[t-s]`.
    SeasonalDifference,
    /// First difference of `ln(1 + y)`.
    LogDifference,
    /// Seasonal difference of the first difference of `ln(1 + y)`.
    SeasonalLogDifference,
    /// `d` first differences followed by `D` seasonal differences; forced only.
    CustomDifference,
}

impl CandidateKind {
    /// The six transformations evaluated in automatic mode, in evaluation order.
    pub const AUTO: [CandidateKind; 6] = [
        CandidateKind::Absolute,
        CandidateKind::FirstDifference,
        CandidateKind::LogTransform,
        CandidateKind::SeasonalDifference,
        CandidateKind::LogDifference,
        CandidateKind::SeasonalLogDifference,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            CandidateKind::Absolute => "Absolute",
            CandidateKind::FirstDifference => "First Difference",
            CandidateKind::LogTransform => "Log Transform",
            CandidateKind::SeasonalDifference => "Seasonal Difference",
            CandidateKind::LogDifference => "Log Difference",
            CandidateKind::SeasonalLogDifference => "Seasonal Log Difference",
            CandidateKind::CustomDifference => "Custom Difference",
        }
    }

    /// Level transform applied before any differencing.
    pub fn level_transform(self) -> LevelTransform {
        match self {
            CandidateKind::LogTransform
            | CandidateKind::LogDifference
            | CandidateKind::SeasonalLogDifference => LevelTransform::Log1p,
            _ => LevelTransform::Identity,
        }
    }

    /// Fixed `(d, D)` orders; `None` for [`CandidateKind::CustomDifference`].
    pub fn orders(self) -> Option<(usize, usize)> {
        match self {
            CandidateKind::Absolute | CandidateKind::LogTransform => Some((0, 0)),
            CandidateKind::FirstDifference | CandidateKind::LogDifference => Some((1, 0)),
            CandidateKind::SeasonalDifference => Some((0, 1)),
            CandidateKind::SeasonalLogDifference => Some((1, 1)),
            CandidateKind::CustomDifference => None,
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CandidateKind {
    type Err = StationarityError;

    /// Accepts the label in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "absolute" | "none" => Ok(CandidateKind::Absolute),
            "firstdifference" | "difference" => Ok(CandidateKind::FirstDifference),
            "logtransform" | "logtransformation" | "log" => Ok(CandidateKind::LogTransform),
            "seasonaldifference" => Ok(CandidateKind::SeasonalDifference),
            "logdifference" => Ok(CandidateKind::LogDifference),
            "seasonallogdifference" => Ok(CandidateKind::SeasonalLogDifference),
            "customdifference" | "custom" => Ok(CandidateKind::CustomDifference),
            _ => Err(StationarityError::UnknownCandidate { name: s.to_string() }),
        }
    }
}

/// Explicit difference sizes for [`CandidateKind::CustomDifference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomDifference {
    /// Number of sequential first differences.
    pub d: usize,
    /// Number of sequential seasonal differences.
    pub seasonal_d: usize,
}

/// Rolling mean and standard deviation over one seasonal window.
///
/// Position `i` summarises the window ending at `index[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingStats {
    /// Timestamp at the end of each window.
    pub index: Vec<NaiveDateTime>,
    /// Window means.
    pub mean: Vec<f64>,
    /// Window sample standard deviations.
    pub sd: Vec<f64>,
}

/// A tested transformation.
///
/// Always carries the transformed series and the full test result; the
/// [`label`](Self::label) is only present when the unit-root null is
/// rejected at the 1% level.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationCandidate {
    kind: CandidateKind,
    adf: AdfResult,
    d: usize,
    seasonal_d: usize,
    transform: LevelTransform,
    series: Series,
    seasonality: usize,
}

impl TransformationCandidate {
    pub(crate) fn new(
        kind: CandidateKind,
        adf: AdfResult,
        (d, seasonal_d): (usize, usize),
        series: Series,
        seasonality: usize,
    ) -> Self {
        Self {
            kind,
            adf,
            d,
            seasonal_d,
            transform: kind.level_transform(),
            series,
            seasonality,
        }
    }

    /// Which transformation was tested.
    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// `Some(kind)` when significant at 1%, `None` otherwise.
    pub fn label(&self) -> Option<CandidateKind> {
        self.is_significant().then_some(self.kind)
    }

    /// `true` when the test statistic is below the 1% critical value.
    pub fn is_significant(&self) -> bool {
        self.adf.rejects_at_1pct()
    }

    /// Full unit-root test result.
    pub fn adf(&self) -> &AdfResult {
        &self.adf
    }

    /// Test statistic.
    pub fn test_statistic(&self) -> f64 {
        self.adf.statistic()
    }

    /// Non-seasonal differencing order `d`.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Seasonal differencing order `D`.
    pub fn seasonal_d(&self) -> usize {
        self.seasonal_d
    }

    /// Level transform (`identity` or `log1p`).
    pub fn transform(&self) -> LevelTransform {
        self.transform
    }

    /// The transformed series the test ran on.
    pub fn transformed_series(&self) -> &Series {
        &self.series
    }

    /// Seasonal period used for seasonal differencing.
    pub fn seasonality(&self) -> usize {
        self.seasonality
    }

    /// Rolling mean and standard deviation of the transformed series over
    /// a window of `seasonality` observations.
    pub fn rolling_stats(&self) -> RollingStats {
        let w = self.seasonality.max(1);
        let values = self.series.values();
        let mean = kairos_stats::rolling_mean(values, w);
        let sd = kairos_stats::rolling_sd(values, w);
        let index = if mean.is_empty() {
            Vec::new()
        } else {
            self.series.index()[w - 1..].to_vec()
        };
        RollingStats { index, mean, sd }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for kind in CandidateKind::AUTO {
            assert_eq!(kind.label().parse::<CandidateKind>().unwrap(), kind);
        }
        assert_eq!(
            "custom_difference".parse::<CandidateKind>().unwrap(),
            CandidateKind::CustomDifference
        );
        assert_eq!(
            "Seasonal-Log-Difference".parse::<CandidateKind>().unwrap(),
            CandidateKind::SeasonalLogDifference
        );
        assert!("boxcox".parse::<CandidateKind>().is_err());
    }

    #[test]
    fn fixed_orders_and_transforms() {
        let table = [
            (CandidateKind::Absolute, (0, 0), LevelTransform::Identity),
            (CandidateKind::FirstDifference, (1, 0), LevelTransform::Identity),
            (CandidateKind::LogTransform, (0, 0), LevelTransform::Log1p),
            (CandidateKind::SeasonalDifference, (0, 1), LevelTransform::Identity),
            (CandidateKind::LogDifference, (1, 0), LevelTransform::Log1p),
            (CandidateKind::SeasonalLogDifference, (1, 1), LevelTransform::Log1p),
        ];
        for (kind, orders, transform) in table {
            assert_eq!(kind.orders(), Some(orders), "{kind}");
            assert_eq!(kind.level_transform(), transform, "{kind}");
        }
        assert_eq!(CandidateKind::CustomDifference.orders(), None);
        assert_eq!(
            CandidateKind::CustomDifference.level_transform(),
            LevelTransform::Identity
        );
    }
}
