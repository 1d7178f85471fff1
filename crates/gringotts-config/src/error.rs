//! Error types for configuration loading.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading process settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value `{value}` for {name}: {reason}")]
    InvalidValue {
        /// Environment variable name.
        name: &'static str,
        /// The offending value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}
