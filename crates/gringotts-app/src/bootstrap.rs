//! Service bootstrap: telemetry, settings, database, and the HTTP listener.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use gringotts_api::{ApiState, router};
use gringotts_config::settings;
use gringotts_data::{connect_pool, ensure_schema};
use gringotts_telemetry::{LoggingConfig, init_logging};

use crate::error::{AppError, AppResult};

/// Wire the service together and serve until shutdown.
///
/// Startup is non-destructive: the schema and tables are created if missing,
/// never dropped.
///
/// # Errors
///
/// Returns an error when telemetry, settings, database bootstrap, or the
/// listener fails.
pub async fn run_app() -> AppResult<()> {
    init_logging(&LoggingConfig::default()).map_err(AppError::Telemetry)?;

    let settings = settings()?;
    let pool = connect_pool(&settings.database_url).await?;
    ensure_schema(&pool).await?;

    let app = router(ApiState::new(pool));
    let addr = SocketAddr::new(settings.http.bind_addr, settings.http.port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "gringotts api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
