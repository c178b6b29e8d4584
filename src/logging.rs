// src/logging.rs

//! Logging setup for `gorun` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from the `GORUN_LOG` environment variable (e.g. "info",
//! "debug") and defaults to `info`. There are no CLI flags for it: every
//! command-line argument belongs to the supervised program.
//!
//! Logs are sent to STDERR so that the child's stdout stays untouched.

use anyhow::Result;
use tracing_subscriber::fmt;

/// Environment variable consulted for the log level.
pub const LOG_ENV: &str = "GORUN_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging() -> Result<()> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(tracing::Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

pub(crate) fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
