//! Top-level application errors.

use thiserror::Error;

/// Result alias for application bootstrap.
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while wiring and running the service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings could not be loaded.
    #[error("configuration failed")]
    Config(#[from] gringotts_config::ConfigError),
    /// The database could not be prepared.
    #[error("database bootstrap failed")]
    Data(#[from] gringotts_data::DataError),
    /// The HTTP listener failed.
    #[error("http server failed")]
    Serve(#[from] std::io::Error),
    /// Telemetry could not be installed.
    #[error("telemetry initialisation failed")]
    Telemetry(#[source] anyhow::Error),
}
