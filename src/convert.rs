//! Pure conversion functions: TOML config structs -> crate API config types.

use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::config::*;

use kairos_io::{ReaderConfig, WriterConfig};
use kairos_sarima::{FitOptions, GridSearchConfig, Initialization, ModelOrder, TrainConfig};
use kairos_series::Frequency;
use kairos_stationarity::{CandidateKind, CustomDifference, Mode};

/// Parses a frequency name (`hourly`, `daily`, `monthly`, `quarterly`, `yearly`).
pub fn parse_frequency(s: &str) -> Result<Frequency> {
    s.parse::<Frequency>()
        .with_context(|| format!("invalid [series].frequency {s:?}"))
}

/// Parses a single-character delimiter, or `tab`.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    if s.eq_ignore_ascii_case("tab") || s == "\\t" {
        return Ok(b'\t');
    }
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => bail!("delimiter must be a single ASCII character or \"tab\", got {s:?}"),
    }
}

/// Parses an initialisation name into the corresponding enum variant.
pub fn parse_initialization(s: &str) -> Result<Initialization> {
    match s.to_lowercase().replace(['-', ' '], "_").as_str() {
        "stationary" => Ok(Initialization::Stationary),
        "approximate_diffuse" | "diffuse" => Ok(Initialization::ApproximateDiffuse),
        other => bail!("unknown initialization: {other:?}"),
    }
}

/// Parses a timeout in seconds.
pub fn parse_timeout(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .with_context(|| format!("timeout_secs must be a positive number, got {secs}"))
}

/// Builds the stationarity [`Mode`] from the TOML transformation section.
///
/// `d` and `seasonal_d` must be given together; a custom difference without
/// them is left for the selector to reject.
pub fn build_mode(t: &TransformationToml) -> Result<Mode> {
    if t.method.eq_ignore_ascii_case("auto") {
        if t.d.is_some() || t.seasonal_d.is_some() {
            bail!("d and seasonal_d only apply to method = \"custom difference\"");
        }
        return Ok(Mode::Auto);
    }
    let kind: CandidateKind = t
        .method
        .parse()
        .with_context(|| format!("invalid [transformation].method {:?}", t.method))?;
    let custom = match (t.d, t.seasonal_d) {
        (Some(d), Some(seasonal_d)) => Some(CustomDifference { d, seasonal_d }),
        (None, None) => None,
        _ => bail!("d and seasonal_d must be set together"),
    };
    if custom.is_some() && kind != CandidateKind::CustomDifference {
        bail!("d and seasonal_d only apply to method = \"custom difference\"");
    }
    Ok(Mode::Forced { kind, custom })
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let delimiter = io.delimiter.as_deref().map(parse_delimiter).transpose()?;
    let mut cfg = ReaderConfig::default()
        .with_date_column(&io.date_column)
        .with_value_column(&io.value_column)
        .with_exog_columns(io.exog_columns.clone())
        .with_delimiter(delimiter)
        .with_sort(io.sort);
    if let Some(ref formats) = io.date_formats {
        cfg = cfg.with_date_formats(formats.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let mut cfg = WriterConfig::default().with_timestamp_format(&io.timestamp_format);
    if let Some(ref d) = io.delimiter {
        cfg = cfg.with_delimiter(parse_delimiter(d)?);
    }
    Ok(cfg)
}

/// Builds the [`FitOptions`] shared by training and the final fit.
pub fn build_fit_options(model: &ModelToml) -> Result<FitOptions> {
    let mut options = FitOptions::new()
        .with_max_iters(model.max_iters)
        .with_sd_tolerance(model.sd_tolerance)
        .with_enforce_invertibility(model.enforce_invertibility)
        .with_include_mean(model.include_mean)
        .with_initialization(parse_initialization(&model.initialization)?);
    if let Some(secs) = model.timeout_secs {
        options = options.with_timeout(parse_timeout(secs)?);
    }
    options.validate()?;
    Ok(options)
}

/// Builds a [`TrainConfig`] from the TOML model configuration.
pub fn build_train_config(model: &ModelToml) -> Result<TrainConfig> {
    let cfg = TrainConfig::new()
        .with_options(build_fit_options(model)?)
        .with_level(model.level);
    cfg.validate()?;
    Ok(cfg)
}

/// Applies `[model]` order overrides to an estimated order.
pub fn apply_order_overrides(estimated: ModelOrder, model: &ModelToml) -> ModelOrder {
    ModelOrder::new(
        model.p.unwrap_or(estimated.p()),
        estimated.d(),
        model.q.unwrap_or(estimated.q()),
    )
    .with_seasonal(
        model.seasonal_p.unwrap_or(estimated.seasonal_p()),
        estimated.seasonal_d(),
        model.seasonal_q.unwrap_or(estimated.seasonal_q()),
        estimated.s(),
    )
}

/// Builds a [`GridSearchConfig`] centred on `order`.
///
/// Fits inside the search never enforce invertibility, whatever the
/// `[model]` section says.
pub fn build_grid_config(
    grid: &GridSearchToml,
    model: &ModelToml,
    order: ModelOrder,
) -> Result<GridSearchConfig> {
    let mut options = build_fit_options(model)?.with_enforce_invertibility(false);
    if let Some(secs) = grid.timeout_secs {
        options = options.with_timeout(parse_timeout(secs)?);
    }
    let mut cfg = GridSearchConfig::new(order.d(), order.seasonal_d(), order.s())
        .around(order.p(), order.q(), order.seasonal_p(), order.seasonal_q())
        .with_options(options);
    if let Some(ref v) = grid.p_values {
        cfg = cfg.with_p_values(v.clone());
    }
    if let Some(ref v) = grid.q_values {
        cfg = cfg.with_q_values(v.clone());
    }
    if let Some(ref v) = grid.seasonal_p_values {
        cfg = cfg.with_seasonal_p_values(v.clone());
    }
    if let Some(ref v) = grid.seasonal_q_values {
        cfg = cfg.with_seasonal_q_values(v.clone());
    }
    cfg.validate()?;
    Ok(cfg)
}
