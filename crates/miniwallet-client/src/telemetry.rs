//! Logging setup for harness binaries and test suites.
//!
//! The client only emits `tracing` records; installing a subscriber is left to
//! the process. `init_logging` is the stock choice: fmt output filtered by
//! `RUST_LOG`, falling back to the configured level.

use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logging configuration for `init_logging`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset (e.g. `info`, `miniwallet_client=debug`)
    pub default_filter: String,
    /// Emit JSON records instead of human readable lines
    pub json_logs: bool,
    /// Write to the test capture writer so output interleaves with libtest
    pub test_writer: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json_logs: false,
            test_writer: false,
        }
    }
}

impl LogConfig {
    /// Create configuration from environment variables.
    ///
    /// - `MINIWALLET_LOG_LEVEL`: default filter (default: info)
    /// - `MINIWALLET_JSON_LOGS`: JSON output (default: false)
    pub fn from_env() -> Self {
        Self {
            default_filter: env::var("MINIWALLET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("MINIWALLET_JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            test_writer: false,
        }
    }

    /// Debug-level output routed through the libtest writer.
    pub fn for_tests() -> Self {
        Self {
            default_filter: "debug".to_string(),
            json_logs: false,
            test_writer: true,
        }
    }
}

/// Install a global fmt subscriber. Returns `false` when one was already
/// installed, which is expected when several tests call this.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(filter);

    match (config.json_logs, config.test_writer) {
        (true, true) => registry
            .with(fmt::layer().json().with_test_writer())
            .try_init()
            .is_ok(),
        (true, false) => registry.with(fmt::layer().json()).try_init().is_ok(),
        (false, true) => registry
            .with(fmt::layer().with_test_writer())
            .try_init()
            .is_ok(),
        (false, false) => registry.with(fmt::layer()).try_init().is_ok(),
    }
}
