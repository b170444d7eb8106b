use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kairos automatic seasonal ARIMA modelling.
#[derive(Parser)]
#[command(
    name = "kairos",
    version,
    about = "Automatic stationarity transformation, seasonal ARIMA order selection and forecasting"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Select a stationarity transformation and estimate model orders.
    Analyze(AnalyzeArgs),
    /// Analyze, train, evaluate on a hold-out set and forecast.
    Forecast(ForecastArgs),
}

/// Options shared by every subcommand. Each overrides the config file.
#[derive(clap::Args)]
pub struct CommonArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override sampling frequency from config.
    #[arg(short, long)]
    pub frequency: Option<String>,

    /// Override transformation method from config ("auto" or a candidate label).
    #[arg(short, long)]
    pub transformation: Option<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(clap::Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path for the JSON report; printed to stdout when absent.
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

/// Arguments for the `forecast` subcommand.
#[derive(clap::Args)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override forecast CSV path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override JSON report path from config.
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Override forecast horizon from config.
    #[arg(short, long)]
    pub periods: Option<usize>,

    /// Override hold-out size from config.
    #[arg(long = "test-size")]
    pub test_size: Option<usize>,

    /// Refine the estimated orders by grid search.
    #[arg(short, long = "grid-search")]
    pub grid_search: bool,
}
