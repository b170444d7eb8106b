use approx::assert_abs_diff_eq;
use chrono::{NaiveDate, NaiveDateTime};
use kairos_series::{Frequency, LevelTransform, Series, SeriesError};

fn monthly(values: Vec<f64>) -> Series {
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(2010, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let index = Frequency::Monthly
        .future_index(start, values.len() - 1)
        .map(|mut rest| {
            rest.insert(0, start);
            rest
        })
        .unwrap();
    Series::new(index, values).unwrap()
}

#[test]
fn seasonal_difference_removes_fixed_pattern() {
    let pattern = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0, 8.0];
    let values: Vec<f64> = (0..48).map(|t| 100.0 + pattern[t % 12]).collect();
    let s = monthly(values);
    let sd = s.diff(Frequency::Monthly.seasonality()).unwrap();
    assert_eq!(sd.len(), 36);
    assert!(sd.values().iter().all(|v| v.abs() < 1e-12));
}

#[test]
fn log_difference_chain_lengths() {
    let values: Vec<f64> = (1..=60).map(|t| t as f64).collect();
    let s = monthly(values);
    let chained = LevelTransform::Log1p
        .apply(&s)
        .unwrap()
        .diff(1)
        .unwrap()
        .diff(12)
        .unwrap();
    assert_eq!(chained.len(), 60 - 1 - 12);
    assert_eq!(chained.last_timestamp(), s.last_timestamp());
}

#[test]
fn expm1_of_log1p_round_trip() {
    let values: Vec<f64> = (0..144)
        .map(|t| 50.0 + 20.0 * ((t as f64) * 0.5).sin() + t as f64)
        .collect();
    let s = monthly(values.clone());
    let logged = LevelTransform::Log1p.apply(&s).unwrap();
    let back = LevelTransform::Log1p.invert_all(logged.values());
    for (a, b) in back.iter().zip(values.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
    }
}

#[test]
fn log1p_rejects_values_below_minus_one() {
    let s = monthly(vec![1.0, -1.5, 2.0]);
    assert!(matches!(
        LevelTransform::Log1p.apply(&s),
        Err(SeriesError::NonFiniteData { position: 1 })
    ));
}

#[test]
fn future_index_continues_series() {
    let s = monthly((0..24).map(f64::from).collect());
    let next = Frequency::Monthly.future_index(s.last_timestamp(), 3).unwrap();
    assert_eq!(next[0].date(), NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
    assert_eq!(next[2].date(), NaiveDate::from_ymd_opt(2012, 3, 1).unwrap());
}
