//! Connection pool construction and teardown.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use crate::error::{DataError, Result};

const MAX_CONNECTIONS: u32 = 8;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the process-wide async connection pool.
///
/// # Errors
///
/// Returns an error if the `PostgreSQL` connection cannot be established.
pub async fn connect_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(|source| DataError::ConnectFailed { source })?;
    debug!(max_connections = MAX_CONNECTIONS, "connection pool ready");
    Ok(pool)
}

/// Close the pool and release every pooled connection.
///
/// Callers that create a pool for a single test run this at teardown.
pub async fn dispose(pool: &PgPool) {
    pool.close().await;
    debug!("connection pool disposed");
}
