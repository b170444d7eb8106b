//! Forecast command: train on a hold-out split, report accuracy, optionally
//! refine the order by grid search, refit on the full series and forecast.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use kairos_io::{ForecastTable, write_forecast_csv, write_json_report};
use kairos_sarima::{Exog, ForecastSeries, ModelOrder, forecast, grid_search, train};
use kairos_series::Frequency;

use crate::analysis;
use crate::analyze_cmd::load_config;
use crate::cli::ForecastArgs;
use crate::convert;
use crate::report::{ForecastReport, ForecastSummary, GridReport, MetricsReport, ModelReport};

/// Hold-out size: the seasonality unless configured, leaving at least one
/// training point.
pub fn resolve_test_size(requested: Option<usize>, seasonality: usize, n: usize) -> Result<usize> {
    let k = requested.unwrap_or(seasonality);
    if k == 0 || k >= n {
        bail!(
            "test_size must be between 1 and {} for a series of {n} points, got {k}",
            n.saturating_sub(1)
        );
    }
    Ok(k)
}

/// Forecast horizon: half the seasonality unless configured, at least one.
pub fn resolve_periods(requested: Option<usize>, seasonality: usize) -> Result<usize> {
    let periods = requested.unwrap_or((seasonality / 2).max(1));
    if periods == 0 {
        bail!("periods must be at least 1");
    }
    Ok(periods)
}

/// Grids over hourly or daily data, or around large `p`/`q`, take long.
pub fn is_expensive_grid(frequency: Frequency, order: ModelOrder) -> bool {
    matches!(frequency, Frequency::Hourly | Frequency::Daily) || order.p() >= 5 || order.q() >= 5
}

/// The last `k` values (all of them when there are fewer).
fn tail(values: &[f64], k: usize) -> &[f64] {
    &values[values.len().saturating_sub(k)..]
}

fn print_forecast(out: &ForecastSeries) {
    println!("{:<20} {:>14} {:>14} {:>14}", "timestamp", "forecast", "lower", "upper");
    for (i, ts) in out.mean.index().iter().enumerate() {
        println!(
            "{:<20} {:>14.4} {:>14.4} {:>14.4}",
            ts.to_string(),
            out.mean.values()[i],
            out.lower.values()[i],
            out.upper.values()[i]
        );
    }
}

/// Run the full training and forecasting pipeline.
pub fn run(args: ForecastArgs) -> Result<()> {
    let _cmd = info_span!("forecast").entered();

    // 1. Config with command-line overrides
    let mut config = load_config(&args.common)?;
    if args.output.is_some() {
        config.io.output = args.output;
    }
    if args.report.is_some() {
        config.io.report = args.report;
    }
    if args.periods.is_some() {
        config.series.periods = args.periods;
    }
    if args.test_size.is_some() {
        config.series.test_size = args.test_size;
    }
    if args.grid_search {
        config.grid_search.enabled = true;
    }
    let train_cfg = convert::build_train_config(&config.model)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;

    // 2. Transformation and order
    let analysis = analysis::run(&config)?;
    let seasonality = analysis.frequency.seasonality();
    let series = &analysis.dataset.series;
    let test_size = resolve_test_size(config.series.test_size, seasonality, series.len())?;
    let periods = resolve_periods(config.series.periods, seasonality)?;

    // 3. Train/test split on the level-transformed scale
    let transform = analysis.stationarity.chosen().transform();
    let levels = transform
        .apply(series)
        .with_context(|| format!("failed to apply {transform} to the series"))?;
    let (train_set, test_set) = levels.split_tail(test_size)?;

    let exog = if analysis.dataset.has_exog() {
        Some(Exog::from_columns(analysis.dataset.exog.clone()).context("invalid exogenous columns")?)
    } else {
        None
    };
    let (train_exog, test_exog) = match &exog {
        Some(x) => {
            let (a, b) = x.split_tail(test_size)?;
            (Some(a), Some(b))
        }
        None => (None, None),
    };

    // 4. Train and score on the original scale
    let trained_order = analysis.order;
    info!(order = %trained_order, train = train_set.len(), test = test_size, "training model");
    let model = train(&train_set, trained_order, train_exog.as_ref(), &train_cfg)
        .with_context(|| {
            format!("failed to train {trained_order}; try smaller AR and MA terms")
        })?;

    let window = 3 * seasonality;
    // Differencing leaves no fitted values for the first d + sD points
    let fitted = model.fitted_values();
    let train_window = window.min(fitted.len());
    let train_metrics = MetricsReport::new(
        &transform.invert_all(tail(train_set.values(), train_window)),
        &transform.invert_all(tail(&fitted, train_window)),
        model.criteria(),
    );
    let test_forecast = model
        .forecast_with_level(test_size, test_exog.as_ref(), train_cfg.level())
        .context("failed to forecast the test set")?;
    let test_metrics = MetricsReport::new(
        &transform.invert_all(tail(test_set.values(), window)),
        &transform.invert_all(tail(test_forecast.mean(), window)),
        model.criteria(),
    );
    info!(
        train_rmse = ?train_metrics.rmse,
        test_rmse = ?test_metrics.rmse,
        test_mape = ?test_metrics.mape,
        "hold-out evaluation"
    );

    // 5. Optional grid search on the training set
    let mut order = trained_order;
    let grid = if config.grid_search.enabled {
        if is_expensive_grid(analysis.frequency, order) {
            warn!(
                frequency = %analysis.frequency,
                order = %order,
                "grid search with these settings may be computationally expensive"
            );
        }
        let grid_cfg = convert::build_grid_config(&config.grid_search, &config.model, order)?;
        let step = (grid_cfg.n_combinations() / 10).max(1);
        let outcome = grid_search(
            train_set.values(),
            train_exog.as_ref(),
            &grid_cfg,
            |done, total| {
                if done % step == 0 || done == total {
                    info!(done, total, "grid search progress");
                }
            },
            None,
        )
        .context("grid search failed")?;
        order = outcome.best_order;
        Some(GridReport::from(&outcome))
    } else {
        None
    };

    // 6. Final model on the full series
    info!(order = %order, n = levels.len(), "fitting final model on the full series");
    let final_model = train(&levels, order, exog.as_ref(), &train_cfg)
        .with_context(|| format!("failed to fit final model {order}"))?;
    println!("{}", final_model.summary());

    // 7. Out-of-sample forecast
    let forecast_summary = if exog.is_some() {
        warn!("exogenous regressors have no future values; skipping out-of-sample forecast");
        None
    } else {
        let out = forecast(
            &final_model,
            levels.last_timestamp(),
            analysis.frequency,
            periods,
            None,
            &train_cfg,
        )
        .context("out-of-sample forecast failed")?
        .map_values(|v| transform.invert(v))?;

        match &config.io.output {
            Some(path) => {
                let table = ForecastTable::new(
                    out.mean.index(),
                    out.mean.values(),
                    out.lower.values(),
                    out.upper.values(),
                )?;
                write_forecast_csv(path, &table, &writer_cfg)
                    .with_context(|| format!("failed to write forecast: {}", path.display()))?;
            }
            None => print_forecast(&out),
        }
        Some(ForecastSummary {
            periods,
            level: out.level,
            first: out.mean.first_timestamp().to_string(),
            last: out.mean.last_timestamp().to_string(),
            output: config.io.output.clone(),
        })
    };

    // 8. Report
    if let Some(path) = &config.io.report {
        let report = ForecastReport {
            analysis: analysis.report(),
            test_size,
            trained_order,
            train_metrics,
            test_metrics,
            grid_search: grid,
            final_model: ModelReport::from(&final_model),
            forecast: forecast_summary,
        };
        write_json_report(path, &report, &writer_cfg)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::cli::CommonArgs;

    #[test]
    fn test_size_defaults_to_seasonality() {
        assert_eq!(resolve_test_size(None, 12, 100).unwrap(), 12);
        assert_eq!(resolve_test_size(Some(5), 12, 100).unwrap(), 5);
        assert!(resolve_test_size(Some(0), 12, 100).is_err());
        assert!(resolve_test_size(None, 12, 12).is_err());
        assert!(resolve_test_size(Some(99), 12, 100).is_ok());
    }

    #[test]
    fn periods_default_to_half_season() {
        assert_eq!(resolve_periods(None, 12).unwrap(), 6);
        assert_eq!(resolve_periods(None, 1).unwrap(), 1);
        assert_eq!(resolve_periods(Some(3), 12).unwrap(), 3);
        assert!(resolve_periods(Some(0), 12).is_err());
    }

    #[test]
    fn expensive_grids() {
        let small = ModelOrder::new(1, 1, 1);
        assert!(is_expensive_grid(Frequency::Daily, small));
        assert!(is_expensive_grid(Frequency::Hourly, small));
        assert!(!is_expensive_grid(Frequency::Monthly, small));
        assert!(is_expensive_grid(Frequency::Monthly, ModelOrder::new(5, 0, 0)));
        assert!(is_expensive_grid(Frequency::Quarterly, ModelOrder::new(0, 0, 5)));
    }

    #[test]
    fn tail_is_clamped() {
        assert_eq!(tail(&[1.0, 2.0, 3.0], 2), &[2.0, 3.0]);
        assert_eq!(tail(&[1.0, 2.0], 5), &[1.0, 2.0]);
    }

    /// Monthly series from 2000-01 with trend, a yearly pattern and a
    /// deterministic wobble. `promo` is not periodic in 12 so it survives
    /// seasonal differencing.
    fn write_monthly_csv(path: &Path, n: usize, with_promo: bool) {
        let mut text = String::from(if with_promo { "date,value,promo\n" } else { "date,value\n" });
        for t in 0..n {
            let (year, month) = (2000 + t / 12, t % 12 + 1);
            let season = 10.0 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin();
            let wobble = ((t * 37) % 11) as f64 * 0.1;
            let promo = ((t * 7) % 5) as f64;
            let value = 100.0 + 0.5 * t as f64 + season + wobble + 2.0 * promo;
            write!(text, "{year}-{month:02},{value}").unwrap();
            if with_promo {
                write!(text, ",{promo}").unwrap();
            }
            text.push('\n');
        }
        std::fs::write(path, text).unwrap();
    }

    fn write_config(dir: &Path, exog: bool) -> PathBuf {
        let path = dir.join("kairos.toml");
        let exog_line = if exog { "exog_columns = [\"promo\"]\n" } else { "" };
        let toml = format!(
            "[io]\n{exog_line}\n\
             [transformation]\nmethod = \"seasonal difference\"\n\n\
             [model]\np = 1\nq = 0\nseasonal_p = 0\nseasonal_q = 0\n"
        );
        std::fs::write(&path, toml).unwrap();
        path
    }

    fn args(dir: &Path, exog: bool) -> ForecastArgs {
        let input = dir.join("series.csv");
        write_monthly_csv(&input, 96, exog);
        ForecastArgs {
            common: CommonArgs {
                config: Some(write_config(dir, exog)),
                input: Some(input),
                frequency: Some("monthly".into()),
                transformation: None,
            },
            output: Some(dir.join("forecast.csv")),
            report: Some(dir.join("report.json")),
            periods: None,
            test_size: None,
            grid_search: false,
        }
    }

    #[test]
    fn pipeline_writes_forecast_and_report() {
        let dir = tempfile::tempdir().unwrap();
        run(args(dir.path(), false)).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("forecast.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "timestamp,forecast,lower,upper");
        assert!(lines[1].starts_with("2008-01-01 00:00:00,"));

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["analysis"]["transformation"]["kind"], "Seasonal Difference");
        assert_eq!(report["test_size"], 12);
        assert_eq!(report["final_model"]["order"]["p"], 1);
        assert_eq!(report["final_model"]["order"]["D"], 1);
        assert_eq!(report["forecast"]["periods"], 6);
        assert_eq!(report["train_metrics"]["points"], 36);
        assert_eq!(report["test_metrics"]["points"], 12);
        assert!(report["grid_search"].is_null());
    }

    #[test]
    fn exogenous_pipeline_skips_future_forecast() {
        let dir = tempfile::tempdir().unwrap();
        run(args(dir.path(), true)).unwrap();

        assert!(!dir.path().join("forecast.csv").exists());
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
                .unwrap();
        assert!(report["forecast"].is_null());
        let params = report["final_model"]["params"].as_array().unwrap();
        assert!(params.iter().any(|p| p["name"] == "promo"));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path(), false);
        a.common.input = Some(dir.path().join("absent.csv"));
        let err = run(a).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read CSV"));
    }
}
