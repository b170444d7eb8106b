//! Shared first stage: read the series, pick a transformation and estimate
//! the model order.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use kairos_io::{Dataset, read_csv};
use kairos_order::{Correlogram, OrderEstimate, correlogram, estimate};
use kairos_sarima::ModelOrder;
use kairos_series::Frequency;
use kairos_stationarity::{StationarityOutcome, evaluate};

use crate::config::KairosConfig;
use crate::convert;
use crate::report::{AnalysisReport, RollingReport};

/// Everything the analysis stage produces.
pub struct Analysis {
    pub input: PathBuf,
    pub dataset: Dataset,
    pub frequency: Frequency,
    pub stationarity: StationarityOutcome,
    pub estimate: OrderEstimate,
    pub correlogram: Option<Correlogram>,
    /// Estimated terms with `[model]` overrides and the chosen `(d, D, s)`.
    pub order: ModelOrder,
}

/// Runs ingestion, stationarity selection and order estimation.
pub fn run(config: &KairosConfig) -> Result<Analysis> {
    let input = config
        .io
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no input path: set [io].input in config or use --input"))?;
    let frequency = convert::parse_frequency(&config.series.frequency)?;
    let seasonality = frequency.seasonality();
    let mode = convert::build_mode(&config.transformation)?;
    let reader_cfg = convert::build_reader_config(&config.io)?;

    info!(path = %input.display(), "reading series");
    let dataset = read_csv(&input, &reader_cfg)
        .with_context(|| format!("failed to read CSV: {}", input.display()))?;

    let stationarity = evaluate(&dataset.series, seasonality, mode)
        .context("stationarity transformation failed")?;
    let chosen = stationarity.chosen();

    let transformed = chosen.transformed_series();
    let estimate = estimate(transformed, seasonality).context(
        "order estimation failed; the series may be too short for the frequency's seasonality",
    )?;
    let correlogram = correlogram(transformed, seasonality).ok();

    let estimated = ModelOrder::new(estimate.p, chosen.d(), estimate.q).with_seasonal(
        estimate.seasonal_p,
        chosen.seasonal_d(),
        estimate.seasonal_q,
        seasonality,
    );
    let order = convert::apply_order_overrides(estimated, &config.model);
    if order != estimated {
        warn!(estimated = %estimated, used = %order, "estimated order overridden by [model]");
    }
    info!(
        transformation = %chosen.kind(),
        order = %order,
        "analysis complete"
    );

    Ok(Analysis {
        input,
        dataset,
        frequency,
        stationarity,
        estimate,
        correlogram,
        order,
    })
}

impl Analysis {
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            input: self.input.clone(),
            frequency: self.frequency.to_string(),
            seasonality: self.frequency.seasonality(),
            observations: self.dataset.series.len(),
            transformation: self.stationarity.chosen().into(),
            attempts: self
                .stationarity
                .attempts()
                .iter()
                .map(Into::into)
                .collect(),
            warnings: self
                .stationarity
                .warnings()
                .iter()
                .map(ToString::to_string)
                .collect(),
            rolling: RollingReport::new(&self.stationarity.chosen().rolling_stats()),
            estimated_terms: self.estimate,
            correlogram: self.correlogram.clone(),
            suggested_order: self.order,
        }
    }
}
