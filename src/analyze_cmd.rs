//! Analyze command: transformation selection and order estimation only.

use anyhow::{Context, Result};
use tracing::info_span;

use kairos_io::write_json_report;

use crate::analysis;
use crate::cli::{AnalyzeArgs, CommonArgs};
use crate::config::KairosConfig;
use crate::convert;

/// Loads the config file and applies the shared command-line overrides.
pub fn load_config(common: &CommonArgs) -> Result<KairosConfig> {
    let mut config = KairosConfig::load(common.config.as_deref())?;
    if let Some(ref input) = common.input {
        config.io.input = Some(input.clone());
    }
    if let Some(ref frequency) = common.frequency {
        config.series.frequency = frequency.clone();
    }
    if let Some(ref method) = common.transformation {
        config.transformation.method = method.clone();
    }
    Ok(config)
}

/// Run the analysis and print or write its JSON report.
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let _cmd = info_span!("analyze").entered();
    let config = load_config(&args.common)?;
    let analysis = analysis::run(&config)?;
    let report = analysis.report();

    match args.report.or_else(|| config.io.report.clone()) {
        Some(path) => {
            let writer_cfg = convert::build_writer_config(&config.io)?;
            write_json_report(&path, &report, &writer_cfg)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
        }
        None => {
            let json = serde_json::to_string_pretty(&report).context("failed to render report")?;
            println!("{json}");
        }
    }
    Ok(())
}
