use std::time::Duration;

use chrono::NaiveDate;
use kairos_sarima::{
    Exog, FitOptions, Initialization, ModelOrder, SarimaError, SarimaSpec, TrainConfig, forecast,
    train,
};
use kairos_series::{Frequency, Series};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

fn monthly(values: Vec<f64>) -> Series {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut index = vec![start];
    index.extend(Frequency::Monthly.future_index(start, values.len() - 1).unwrap());
    Series::new(index, values).unwrap()
}

/// `(1 - 0.6 B^4) u_t = e_t`, around a level of 20.
fn seasonal_ar(n: usize, seed: u64) -> Vec<f64> {
    let e = noise(n, seed);
    let mut u = vec![0.0; n];
    for t in 0..n {
        u[t] = e[t] + if t >= 4 { 0.6 * u[t - 4] } else { 0.0 };
    }
    u.iter().map(|v| v + 20.0).collect()
}

#[test]
fn recovers_seasonal_ar_coefficient() {
    let data = seasonal_ar(240, 17);
    let order = ModelOrder::new(0, 0, 0).with_seasonal(1, 0, 0, 4);
    let fit = SarimaSpec::new(order).fit(&data, None).unwrap();
    assert_eq!(fit.seasonal_ar().len(), 1);
    assert!(
        (fit.seasonal_ar()[0] - 0.6).abs() < 0.15,
        "seasonal AR: expected ~0.6, got {}",
        fit.seasonal_ar()[0]
    );
    assert!((fit.intercept().unwrap() - 20.0).abs() < 1.0);
    assert!(fit.sigma2() > 0.6 && fit.sigma2() < 1.5, "sigma2 = {}", fit.sigma2());
}

#[test]
fn richer_model_has_higher_likelihood() {
    let data = seasonal_ar(200, 23);
    let plain = SarimaSpec::new(ModelOrder::new(0, 0, 0)).fit(&data, None).unwrap();
    let seasonal = SarimaSpec::new(ModelOrder::new(0, 0, 0).with_seasonal(1, 0, 0, 4))
        .fit(&data, None)
        .unwrap();
    assert!(seasonal.log_likelihood() > plain.log_likelihood());
    assert!(seasonal.aic() < plain.aic());
}

#[test]
fn fitted_values_track_the_series() {
    let data = seasonal_ar(160, 5);
    let order = ModelOrder::new(0, 0, 0).with_seasonal(1, 0, 0, 4);
    let fit = SarimaSpec::new(order).fit(&data, None).unwrap();
    let fitted = fit.fitted_values();
    assert_eq!(fitted.len(), data.len());
    let rmse = kairos_stats::rmse(&data, &fitted).unwrap();
    assert!((rmse * rmse - fit.sigma2()).abs() < 0.3 * fit.sigma2());
}

#[test]
fn seasonal_difference_forecast_repeats_pattern() {
    let pattern = [3.0, -1.0, 4.0, -6.0];
    let noise = noise(96, 31);
    let data: Vec<f64> = (0..96)
        .map(|t| 50.0 + pattern[t % 4] + 0.05 * noise[t])
        .collect();
    let order = ModelOrder::new(0, 0, 0).with_seasonal(0, 1, 0, 4);
    let options = FitOptions::new().with_include_mean(false);
    let fit = SarimaSpec::new(order).with_options(options).fit(&data, None).unwrap();
    let f = fit.forecast(8, None).unwrap();
    for h in 0..8 {
        assert_eq!(f.mean()[h], data[92 + h % 4]);
        assert!(f.lower()[h] < f.mean()[h] && f.mean()[h] < f.upper()[h]);
    }
    assert!(f.std_err()[4] > f.std_err()[3]);
}

#[test]
fn train_and_forecast_with_index() {
    let e = noise(120, 77);
    let mut y = vec![100.0; 120];
    for t in 1..120 {
        y[t] = y[t - 1] + 0.3 + e[t] + 0.4 * e[t - 1];
    }
    let series = monthly(y);
    let order = ModelOrder::new(0, 1, 1);
    let config = TrainConfig::default();
    let model = train(&series, order, None, &config).unwrap();
    assert_eq!(model.residuals().len(), 119);
    assert!(model.ma()[0] > 0.1, "theta = {}", model.ma()[0]);

    let out = forecast(&model, series.last_timestamp(), Frequency::Monthly, 12, None, &config)
        .unwrap();
    assert_eq!(out.mean.len(), 12);
    assert_eq!(
        out.mean.first_timestamp().date(),
        NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()
    );
    let widths: Vec<f64> = out
        .upper
        .values()
        .iter()
        .zip(out.lower.values())
        .map(|(u, l)| u - l)
        .collect();
    assert!(widths.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn exog_model_round_trip() {
    let e = noise(150, 8);
    let x: Vec<f64> = (0..150).map(|t| ((t * 5) % 11) as f64).collect();
    let y: Vec<f64> = (0..150).map(|t| 3.0 - 1.5 * x[t] + e[t]).collect();
    let exog = Exog::from_columns(vec![("promo".into(), x)]).unwrap();
    let (train_exog, test_exog) = exog.split_tail(6).unwrap();

    let fit = SarimaSpec::new(ModelOrder::new(1, 0, 0))
        .fit(&y[..144], Some(&train_exog))
        .unwrap();
    assert!((fit.exog_coefficients()[0] + 1.5).abs() < 0.1);
    assert!(fit.summary().contains("promo"));

    assert_eq!(fit.forecast(6, None).unwrap_err(), SarimaError::MissingFutureExog);
    let f = fit.forecast(6, Some(&test_exog)).unwrap();
    for h in 0..6 {
        assert!((f.mean()[h] - (y[144 + h] - e[144 + h])).abs() < 1.0);
    }
}

#[test]
fn timeout_is_reported() {
    let data = seasonal_ar(120, 2);
    let options = FitOptions::new().with_timeout(Duration::from_nanos(1));
    let err = SarimaSpec::new(ModelOrder::new(1, 0, 1))
        .with_options(options)
        .fit(&data, None)
        .unwrap_err();
    assert_eq!(
        err,
        SarimaError::Timeout {
            limit: Duration::from_nanos(1)
        }
    );
}

#[test]
fn diffuse_and_stationary_agree_on_long_series() {
    let data = seasonal_ar(300, 41);
    let order = ModelOrder::new(1, 0, 0);
    let a = SarimaSpec::new(order).fit(&data, None).unwrap();
    let b = SarimaSpec::new(order)
        .with_options(FitOptions::new().with_initialization(Initialization::ApproximateDiffuse))
        .fit(&data, None)
        .unwrap();
    assert!((a.ar()[0] - b.ar()[0]).abs() < 0.05);
}
