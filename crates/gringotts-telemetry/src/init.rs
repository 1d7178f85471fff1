//! Tracing subscriber setup.
//!
//! # Design
//! - Single entry point for logging configuration (fmt or JSON output).
//! - `RUST_LOG` wins over the configured level when present.
//! - Tests use [`init_for_tests`], which tolerates repeat installation.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level string (e.g., `info`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber cannot be installed, for example
/// because another subscriber has already been set globally.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let filter = env_filter(config.level);
    let builder = fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|err| anyhow!("failed to install json subscriber: {err}")),
        LogFormat::Pretty => builder
            .try_init()
            .map_err(|err| anyhow!("failed to install fmt subscriber: {err}")),
    }
}

/// Install a test-friendly subscriber, ignoring repeat installation.
pub fn init_for_tests() {
    let _ = fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_matches_build_profile() {
        let expected = if cfg!(debug_assertions) {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        };
        assert_eq!(LogFormat::infer(), expected);
    }

    #[test]
    fn default_config_uses_info_level() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn repeated_test_init_is_harmless() {
        init_for_tests();
        init_for_tests();
    }
}
