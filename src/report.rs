//! Serialisable run reports built from the library result types.

use std::path::PathBuf;

use serde::Serialize;

use kairos_order::{Correlogram, OrderEstimate};
use kairos_sarima::{
    CombinationResult, Criteria, FittedModel, GridSearchOutcome, Initialization, ModelOrder,
};
use kairos_stationarity::{Attempt, RollingStats, TransformationCandidate};

#[derive(Debug, Serialize)]
pub struct CriticalValuesReport {
    #[serde(rename = "1%")]
    pub one_pct: f64,
    #[serde(rename = "5%")]
    pub five_pct: f64,
    #[serde(rename = "10%")]
    pub ten_pct: f64,
}

/// One tested transformation. `label` is null when the unit root is not
/// rejected at 1%.
#[derive(Debug, Serialize)]
pub struct CandidateReport {
    pub kind: String,
    pub label: Option<String>,
    pub test_statistic: f64,
    pub p_value: f64,
    pub lags_used: usize,
    pub n_obs: usize,
    pub critical_values: CriticalValuesReport,
    pub d: usize,
    #[serde(rename = "D")]
    pub seasonal_d: usize,
    pub transform: &'static str,
    pub seasonality: usize,
}

impl From<&TransformationCandidate> for CandidateReport {
    fn from(c: &TransformationCandidate) -> Self {
        let adf = c.adf();
        let cv = adf.critical_values();
        Self {
            kind: c.kind().to_string(),
            label: c.label().map(|k| k.to_string()),
            test_statistic: adf.statistic(),
            p_value: adf.p_value(),
            lags_used: adf.used_lag(),
            n_obs: adf.n_obs(),
            critical_values: CriticalValuesReport {
                one_pct: cv.one_pct,
                five_pct: cv.five_pct,
                ten_pct: cv.ten_pct,
            },
            d: c.d(),
            seasonal_d: c.seasonal_d(),
            transform: c.transform().name(),
            seasonality: c.seasonality(),
        }
    }
}

/// A transformation attempt: the tested candidate or why it failed.
#[derive(Debug, Serialize)]
pub struct AttemptReport {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<CandidateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Attempt> for AttemptReport {
    fn from(a: &Attempt) -> Self {
        let (candidate, error) = match &a.result {
            Ok(c) => (Some(c.into()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            kind: a.kind.to_string(),
            candidate,
            error,
        }
    }
}

/// Spread of the seasonal-window rolling mean and standard deviation of
/// the chosen transformed series.
#[derive(Debug, Serialize)]
pub struct RollingReport {
    pub windows: usize,
    pub mean_min: f64,
    pub mean_max: f64,
    pub sd_min: f64,
    pub sd_max: f64,
}

impl RollingReport {
    /// `None` when the series is shorter than one window.
    pub fn new(stats: &RollingStats) -> Option<Self> {
        if stats.mean.is_empty() {
            return None;
        }
        let fold = |xs: &[f64]| {
            xs.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
        };
        let (mean_min, mean_max) = fold(&stats.mean);
        let (sd_min, sd_max) = fold(&stats.sd);
        Some(Self {
            windows: stats.mean.len(),
            mean_min,
            mean_max,
            sd_min,
            sd_max,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub input: PathBuf,
    pub frequency: String,
    pub seasonality: usize,
    pub observations: usize,
    pub transformation: CandidateReport,
    pub attempts: Vec<AttemptReport>,
    pub warnings: Vec<String>,
    pub rolling: Option<RollingReport>,
    pub estimated_terms: OrderEstimate,
    /// Absent for a constant transformed series.
    pub correlogram: Option<Correlogram>,
    pub suggested_order: ModelOrder,
}

/// Accuracy on the original scale plus the model's information criteria.
#[derive(Debug, Serialize)]
pub struct MetricsReport {
    pub points: usize,
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
    /// Percent; absent when an actual value is zero.
    pub mape: Option<f64>,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
}

impl MetricsReport {
    pub fn new(actual: &[f64], predicted: &[f64], criteria: Criteria) -> Self {
        Self {
            points: actual.len(),
            rmse: kairos_stats::rmse(actual, predicted),
            mae: kairos_stats::mae(actual, predicted),
            mape: kairos_stats::mape(actual, predicted),
            aic: criteria.aic,
            bic: criteria.bic,
            hqic: criteria.hqic,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParamReport {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ModelReport {
    pub order: ModelOrder,
    pub initialization: Initialization,
    pub converged: bool,
    pub iterations: u64,
    pub nobs: usize,
    pub log_likelihood: f64,
    pub sigma2: f64,
    pub criteria: Criteria,
    pub params: Vec<ParamReport>,
}

impl From<&FittedModel> for ModelReport {
    fn from(m: &FittedModel) -> Self {
        Self {
            order: m.order(),
            initialization: m.initialization(),
            converged: m.converged(),
            iterations: m.iterations(),
            nobs: m.nobs(),
            log_likelihood: m.log_likelihood(),
            sigma2: m.sigma2(),
            criteria: m.criteria(),
            params: m
                .params()
                .into_iter()
                .map(|(name, value)| ParamReport { name, value })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CombinationReport {
    pub order: ModelOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&CombinationResult> for CombinationReport {
    fn from(r: &CombinationResult) -> Self {
        let (criteria, error) = match &r.outcome {
            Ok(c) => (Some(*c), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            order: r.order,
            criteria,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GridReport {
    pub attempted: usize,
    pub failed: usize,
    pub best_order: ModelOrder,
    pub best_criteria: Criteria,
    pub combinations: Vec<CombinationReport>,
}

impl From<&GridSearchOutcome> for GridReport {
    fn from(o: &GridSearchOutcome) -> Self {
        Self {
            attempted: o.attempted,
            failed: o.failed,
            best_order: o.best_order,
            best_criteria: o.best_criteria,
            combinations: o.results.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ForecastSummary {
    pub periods: usize,
    pub level: f64,
    pub first: String,
    pub last: String,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ForecastReport {
    pub analysis: AnalysisReport,
    pub test_size: usize,
    pub trained_order: ModelOrder,
    pub train_metrics: MetricsReport,
    pub test_metrics: MetricsReport,
    pub grid_search: Option<GridReport>,
    pub final_model: ModelReport,
    /// Absent when exogenous regressors have no future values.
    pub forecast: Option<ForecastSummary>,
}
