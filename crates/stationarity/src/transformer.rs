//! Stationarity transformation selection.

use std::fmt;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use kairos_series::Series;

use crate::adf::adfuller;
use crate::candidate::{CandidateKind, CustomDifference, TransformationCandidate};
use crate::error::StationarityError;

/// How [`evaluate`] chooses a transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Test the six fixed candidates and keep the most significant.
    Auto,
    /// Test only `kind`. `custom` is required for
    /// [`CandidateKind::CustomDifference`] and ignored otherwise.
    Forced {
        /// The transformation to use.
        kind: CandidateKind,
        /// Difference sizes for a custom difference.
        custom: Option<CustomDifference>,
    },
}

/// Non-fatal findings the caller must surface.
#[derive(Debug, Clone, PartialEq)]
pub enum StationarityWarning {
    /// A forced transformation does not reject the unit root at 1%.
    NonSignificant {
        /// The forced transformation.
        kind: CandidateKind,
        /// Its test statistic.
        statistic: f64,
        /// The 1% critical value it failed to beat.
        critical_1pct: f64,
    },
    /// No automatic candidate was significant; the raw series is used.
    NoSignificantCandidate,
}

impl fmt::Display for StationarityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationarityWarning::NonSignificant {
                kind,
                statistic,
                critical_1pct,
            } => write!(
                f,
                "{kind} is not significant at 99% confidence \
                 (statistic {statistic:.4} >= 1% critical value {critical_1pct:.4}); \
                 proceeding with it anyway"
            ),
            StationarityWarning::NoSignificantCandidate => f.write_str(
                "no transformation rejects the unit root at 99% confidence; \
                 falling back to the absolute series",
            ),
        }
    }
}

/// One tested transformation: the candidate, or why it could not be tested.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    /// Which transformation was attempted.
    pub kind: CandidateKind,
    /// The tested candidate or the failure.
    pub result: Result<TransformationCandidate, StationarityError>,
}

/// Result of [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityOutcome {
    chosen: TransformationCandidate,
    attempts: Vec<Attempt>,
    warnings: Vec<StationarityWarning>,
}

impl StationarityOutcome {
    /// The selected transformation.
    pub fn chosen(&self) -> &TransformationCandidate {
        &self.chosen
    }

    /// Consumes the outcome, returning the selected transformation.
    pub fn into_chosen(self) -> TransformationCandidate {
        self.chosen
    }

    /// Every attempted transformation in evaluation order.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Warnings the caller must report.
    pub fn warnings(&self) -> &[StationarityWarning] {
        &self.warnings
    }
}

/// Derives the series a candidate is tested on, with its `(d, D)` orders.
///
/// Custom differencing applies `d` sequential first differences, then `D`
/// sequential seasonal differences at lag `seasonality`.
pub fn derive_series(
    series: &Series,
    kind: CandidateKind,
    seasonality: usize,
    custom: Option<CustomDifference>,
) -> Result<(Series, (usize, usize)), StationarityError> {
    if seasonality == 0 {
        return Err(StationarityError::InvalidSeasonality);
    }
    let (d, seasonal_d) = match kind.orders() {
        Some(orders) => orders,
        None => {
            let c = custom.ok_or(StationarityError::MissingParameter { kind })?;
            (c.d, c.seasonal_d)
        }
    };
    let levels = kind.level_transform().apply(series)?;
    let derived = levels.diff_n(1, d)?.diff_n(seasonality, seasonal_d)?;
    Ok((derived, (d, seasonal_d)))
}

/// Derives and tests a single candidate.
pub fn test_candidate(
    series: &Series,
    kind: CandidateKind,
    seasonality: usize,
    custom: Option<CustomDifference>,
) -> Result<TransformationCandidate, StationarityError> {
    let (derived, orders) = derive_series(series, kind, seasonality, custom)?;
    let adf = adfuller(derived.values())?;
    debug!(
        candidate = %kind,
        statistic = adf.statistic(),
        p_value = adf.p_value(),
        used_lag = adf.used_lag(),
        critical_1pct = adf.critical_values().one_pct,
        "tested transformation"
    );
    Ok(TransformationCandidate::new(
        kind,
        adf,
        orders,
        derived,
        seasonality,
    ))
}

/// Chooses a stationarity-inducing transformation for `series`.
///
/// In [`Mode::Auto`] the six fixed candidates are tested independently and
/// the significant one with the lowest statistic is chosen (earlier
/// candidates win exact ties). When none is significant the Absolute
/// candidate is returned with a [`StationarityWarning::NoSignificantCandidate`].
///
/// In [`Mode::Forced`] only the requested candidate is tested; it is
/// returned even when not significant, with a
/// [`StationarityWarning::NonSignificant`].
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StationarityError::MissingParameter`] | custom difference without `(d, D)` |
/// | [`StationarityError::InvalidSeasonality`] | `seasonality == 0` |
/// | any test error | the forced candidate, or Absolute in auto fallback, cannot be tested |
#[tracing::instrument(skip(series), fields(n = series.len()))]
pub fn evaluate(
    series: &Series,
    seasonality: usize,
    mode: Mode,
) -> Result<StationarityOutcome, StationarityError> {
    if seasonality == 0 {
        return Err(StationarityError::InvalidSeasonality);
    }
    match mode {
        Mode::Forced { kind, custom } => {
            let candidate = test_candidate(series, kind, seasonality, custom)?;
            let mut warnings = Vec::new();
            if !candidate.is_significant() {
                let w = StationarityWarning::NonSignificant {
                    kind,
                    statistic: candidate.test_statistic(),
                    critical_1pct: candidate.adf().critical_values().one_pct,
                };
                warn!("{w}");
                warnings.push(w);
            }
            info!(candidate = %kind, d = candidate.d(), seasonal_d = candidate.seasonal_d(), "using forced transformation");
            Ok(StationarityOutcome {
                attempts: vec![Attempt {
                    kind,
                    result: Ok(candidate.clone()),
                }],
                chosen: candidate,
                warnings,
            })
        }
        Mode::Auto => {
            let attempts: Vec<Attempt> = CandidateKind::AUTO
                .par_iter()
                .map(|&kind| Attempt {
                    kind,
                    result: test_candidate(series, kind, seasonality, None),
                })
                .collect();

            for a in &attempts {
                if let Err(e) = &a.result {
                    debug!(candidate = %a.kind, error = %e, "transformation could not be tested");
                }
            }

            let best = attempts
                .iter()
                .filter_map(|a| a.result.as_ref().ok())
                .filter(|c| c.is_significant())
                .fold(None::<&TransformationCandidate>, |best, c| match best {
                    Some(b) if b.test_statistic() <= c.test_statistic() => Some(b),
                    _ => Some(c),
                })
                .cloned();

            let mut warnings = Vec::new();
            let chosen = match best {
                Some(c) => c,
                None => {
                    let w = StationarityWarning::NoSignificantCandidate;
                    warn!("{w}");
                    warnings.push(w);
                    attempts
                        .iter()
                        .find(|a| a.kind == CandidateKind::Absolute)
                        .map(|a| a.result.clone())
                        .unwrap_or_else(|| {
                            test_candidate(series, CandidateKind::Absolute, seasonality, None)
                        })?
                }
            };
            info!(
                candidate = %chosen.kind(),
                statistic = chosen.test_statistic(),
                d = chosen.d(),
                seasonal_d = chosen.seasonal_d(),
                "selected transformation"
            );
            Ok(StationarityOutcome {
                chosen,
                attempts,
                warnings,
            })
        }
    }
}
