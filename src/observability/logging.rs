//! Structured logging.
//!
//! Logs go to stderr so stdout carries only the report (and stays valid JSON
//! in `--json` mode). `RUST_LOG` overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "refiner_cli=warn";
const DEBUG_FILTER: &str = "refiner_cli=debug";

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global subscriber. Safe to call once per process.
pub fn init_logging(debug: bool) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "refiner_cli=warn");
        assert_eq!(default_filter(true), "refiner_cli=debug");
    }
}
