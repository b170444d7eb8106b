use approx::assert_abs_diff_eq;
use chrono::{NaiveDate, NaiveDateTime};
use kairos_series::{Frequency, LevelTransform, Series};
use kairos_stationarity::{
    CandidateKind, CustomDifference, Mode, StationarityError, StationarityWarning, evaluate,
};

/// Small 64-bit LCG so the reference statistics below are reproducible
/// bit for bit.
struct Lcg(u64);

impl Lcg {
    fn uniform(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Irwin-Hall approximation of a standard normal draw.
    fn noise(&mut self) -> f64 {
        (0..12).map(|_| self.uniform()).sum::<f64>() - 6.0
    }
}

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn monthly(values: Vec<f64>) -> Series {
    let mut index = vec![start()];
    index.extend(Frequency::Monthly.future_index(start(), values.len() - 1).unwrap());
    Series::new(index, values).unwrap()
}

/// Linear ramp plus a random walk: non-stationary in levels, white noise
/// after one difference.
fn ramp_with_drift() -> Series {
    let mut rng = Lcg(42);
    let mut walk = 0.0;
    let values = (0..120)
        .map(|t| {
            walk += rng.noise();
            10.0 + t as f64 + walk
        })
        .collect();
    monthly(values)
}

/// The exact linear ramp `1, 2, .., 144`.
fn linear_ramp() -> Series {
    monthly((1..=144).map(f64::from).collect())
}

/// Random-walk level with a multiplicative period-12 pattern.
fn seasonal_growth() -> Series {
    const PATTERN: [f64; 12] = [
        0.0, 3.0, 7.0, 10.0, 12.0, 10.0, 7.0, 3.0, 0.0, -3.0, -6.0, -3.0,
    ];
    let mut rng = Lcg(1);
    let mut walk = 0.0;
    let values = (0..144)
        .map(|t| {
            walk += 0.3 * rng.noise();
            100.0 + walk + 5.0 * PATTERN[t % 12] * (1.0 + 0.01 * t as f64) + rng.noise()
        })
        .collect();
    monthly(values)
}

/// Integrated twice: no candidate differences it enough.
fn doubly_integrated() -> Series {
    let mut rng = Lcg(1);
    let mut slope = 0.0;
    let mut level = 0.0;
    let values = (0..80)
        .map(|_| {
            slope += rng.noise();
            level += slope;
            500.0 + level
        })
        .collect();
    monthly(values)
}

#[test]
fn ramp_selects_first_difference() {
    let outcome = evaluate(&ramp_with_drift(), 12, Mode::Auto).unwrap();
    let chosen = outcome.chosen();

    assert_eq!(chosen.kind(), CandidateKind::FirstDifference);
    assert_eq!(chosen.label(), Some(CandidateKind::FirstDifference));
    assert_eq!((chosen.d(), chosen.seasonal_d()), (1, 0));
    assert_eq!(chosen.transform(), LevelTransform::Identity);
    assert_abs_diff_eq!(chosen.test_statistic(), -12.476902388, epsilon = 1e-6);
    assert_eq!(chosen.adf().used_lag(), 0);
    assert_eq!(chosen.adf().n_obs(), 118);
    assert!(outcome.warnings().is_empty());
}

#[test]
fn ramp_levels_are_not_significant() {
    let outcome = evaluate(&ramp_with_drift(), 12, Mode::Auto).unwrap();
    let absolute = outcome
        .attempts()
        .iter()
        .find(|a| a.kind == CandidateKind::Absolute)
        .unwrap()
        .result
        .as_ref()
        .unwrap();

    assert!(!absolute.is_significant());
    assert_eq!(absolute.label(), None);
    assert_abs_diff_eq!(absolute.test_statistic(), -0.655631909, epsilon = 1e-6);
    assert_abs_diff_eq!(
        absolute.adf().critical_values().one_pct,
        -3.486534606,
        epsilon = 1e-6
    );
}

#[test]
fn linear_ramp_selects_first_difference() {
    let outcome = evaluate(&linear_ramp(), 12, Mode::Auto).unwrap();
    assert!(outcome.attempts().iter().all(|a| a.result.is_ok()));

    let absolute = outcome
        .attempts()
        .iter()
        .find(|a| a.kind == CandidateKind::Absolute)
        .unwrap()
        .result
        .as_ref()
        .unwrap();
    assert!(!absolute.is_significant());
    assert_eq!(absolute.label(), None);

    let chosen = outcome.chosen();
    assert_eq!(chosen.kind(), CandidateKind::FirstDifference);
    assert_eq!(chosen.label(), Some(CandidateKind::FirstDifference));
    assert_eq!((chosen.d(), chosen.seasonal_d()), (1, 0));
    assert_eq!(chosen.test_statistic(), f64::NEG_INFINITY);
    assert!(outcome.warnings().is_empty());
}

#[test]
fn smooth_log_trend_candidates_are_testable() {
    for kind in [
        CandidateKind::LogTransform,
        CandidateKind::LogDifference,
        CandidateKind::SeasonalLogDifference,
    ] {
        let mode = Mode::Forced { kind, custom: None };
        let outcome = evaluate(&linear_ramp(), 12, mode)
            .unwrap_or_else(|e| panic!("{kind} failed: {e}"));
        assert!(!outcome.chosen().test_statistic().is_nan(), "{kind}");
        assert_eq!(outcome.chosen().transform(), LevelTransform::Log1p);
    }
}

#[test]
fn auto_reports_all_six_attempts_in_order() {
    let outcome = evaluate(&ramp_with_drift(), 12, Mode::Auto).unwrap();
    let kinds: Vec<CandidateKind> = outcome.attempts().iter().map(|a| a.kind).collect();
    assert_eq!(kinds, CandidateKind::AUTO.to_vec());
    assert!(outcome.attempts().iter().all(|a| a.result.is_ok()));
}

#[test]
fn chosen_candidate_has_lowest_significant_statistic() {
    let outcome = evaluate(&seasonal_growth(), 12, Mode::Auto).unwrap();
    let best = outcome.chosen().test_statistic();
    for attempt in outcome.attempts() {
        if let Ok(c) = &attempt.result
            && c.is_significant()
        {
            assert!(best <= c.test_statistic(), "{} beats the choice", c.kind());
        }
    }
}

#[test]
fn seasonal_pattern_selects_seasonal_candidate() {
    let outcome = evaluate(&seasonal_growth(), 12, Mode::Auto).unwrap();
    let chosen = outcome.chosen();

    assert!(matches!(
        chosen.kind(),
        CandidateKind::SeasonalDifference | CandidateKind::SeasonalLogDifference
    ));
    assert_eq!(chosen.seasonal_d(), 1);
    assert_eq!(chosen.seasonality(), 12);
    assert!(chosen.is_significant());
}

#[test]
fn no_significant_candidate_falls_back_to_absolute() {
    let series = doubly_integrated();
    let outcome = evaluate(&series, 12, Mode::Auto).unwrap();

    assert_eq!(outcome.chosen().kind(), CandidateKind::Absolute);
    assert_eq!(outcome.chosen().label(), None);
    assert_eq!(
        outcome.warnings(),
        &[StationarityWarning::NoSignificantCandidate]
    );
    assert_eq!(outcome.chosen().transformed_series(), &series);
}

#[test]
fn forced_non_significant_candidate_warns() {
    let mode = Mode::Forced {
        kind: CandidateKind::Absolute,
        custom: None,
    };
    let outcome = evaluate(&ramp_with_drift(), 12, mode).unwrap();

    assert_eq!(outcome.chosen().kind(), CandidateKind::Absolute);
    assert_eq!(outcome.attempts().len(), 1);
    match outcome.warnings() {
        [StationarityWarning::NonSignificant { kind, statistic, .. }] => {
            assert_eq!(*kind, CandidateKind::Absolute);
            assert_abs_diff_eq!(*statistic, -0.655631909, epsilon = 1e-6);
        }
        other => panic!("unexpected warnings: {other:?}"),
    }
}

#[test]
fn custom_difference_requires_orders() {
    let mode = Mode::Forced {
        kind: CandidateKind::CustomDifference,
        custom: None,
    };
    let err = evaluate(&ramp_with_drift(), 12, mode).unwrap_err();
    assert_eq!(
        err,
        StationarityError::MissingParameter {
            kind: CandidateKind::CustomDifference
        }
    );
}

#[test]
fn custom_zero_orders_match_absolute() {
    let series = ramp_with_drift();
    let custom = evaluate(
        &series,
        12,
        Mode::Forced {
            kind: CandidateKind::CustomDifference,
            custom: Some(CustomDifference { d: 0, seasonal_d: 0 }),
        },
    )
    .unwrap();
    let absolute = evaluate(
        &series,
        12,
        Mode::Forced {
            kind: CandidateKind::Absolute,
            custom: None,
        },
    )
    .unwrap();

    assert_eq!(
        custom.chosen().test_statistic(),
        absolute.chosen().test_statistic()
    );
    assert_eq!(custom.chosen().transformed_series(), &series);
}

#[test]
fn custom_first_difference_matches_fixed_candidate() {
    let series = ramp_with_drift();
    let custom = evaluate(
        &series,
        12,
        Mode::Forced {
            kind: CandidateKind::CustomDifference,
            custom: Some(CustomDifference { d: 1, seasonal_d: 0 }),
        },
    )
    .unwrap();
    assert_abs_diff_eq!(custom.chosen().test_statistic(), -12.476902388, epsilon = 1e-6);
    assert_eq!(custom.chosen().d(), 1);
}

#[test]
fn zero_seasonality_is_rejected() {
    let err = evaluate(&ramp_with_drift(), 0, Mode::Auto).unwrap_err();
    assert_eq!(err, StationarityError::InvalidSeasonality);
}

#[test]
fn too_short_series_is_an_error() {
    let series = monthly(vec![1.0, 2.0, 4.0]);
    let err = evaluate(
        &series,
        12,
        Mode::Forced {
            kind: CandidateKind::Absolute,
            custom: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, StationarityError::InsufficientData { .. }));
}

#[test]
fn rolling_stats_follow_the_seasonal_window() {
    let outcome = evaluate(&ramp_with_drift(), 12, Mode::Auto).unwrap();
    let chosen = outcome.chosen();
    let rolling = chosen.rolling_stats();
    let n = chosen.transformed_series().len();
    assert_eq!(rolling.mean.len(), n - 11);
    assert_eq!(rolling.sd.len(), n - 11);
    assert_eq!(rolling.index.len(), n - 11);
}
