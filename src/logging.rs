use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "kairos",
    "kairos_io",
    "kairos_order",
    "kairos_sarima",
    "kairos_series",
    "kairos_stationarity",
    "kairos_stats",
];

/// Maps the `-v` count to a level: none warn, `-v` info, `-vv` debug,
/// `-vvv` and above trace.
fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn default_filter(verbosity: u8) -> String {
    let level = level(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing based on CLI verbosity level.
///
/// `RUST_LOG` env var overrides the CLI flag if set. Logs go to stderr so
/// reports printed to stdout stay machine-readable.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level(0), "warn");
        assert_eq!(level(1), "info");
        assert_eq!(level(2), "debug");
        assert_eq!(level(7), "trace");
    }

    #[test]
    fn filter_covers_every_crate() {
        let filter = default_filter(1);
        assert!(filter.starts_with("kairos=info,"));
        assert_eq!(filter.split(',').count(), CRATE_TARGETS.len());
        assert!(filter.contains("kairos_sarima=info"));
    }
}
