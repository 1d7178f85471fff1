//! Health and diagnostics endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

use crate::errors::ApiError;
use crate::state::ApiState;

/// Status of a single dependency.
#[derive(Debug, Serialize)]
pub struct HealthComponent {
    /// Component status, `ok` when reachable.
    pub status: &'static str,
}

/// Aggregate health report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Database connectivity status.
    pub database: HealthComponent,
}

/// Report service health, pinging the database.
///
/// # Errors
///
/// Returns 503 when the database does not answer the ping.
pub async fn health(State(state): State<Arc<ApiState>>) -> Result<Json<HealthResponse>, ApiError> {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => Ok(Json(HealthResponse {
            status: "ok",
            database: HealthComponent { status: "ok" },
        })),
        Err(err) => {
            warn!(error = %err, "health check failed to reach database");
            Err(ApiError::service_unavailable(
                "database is currently unavailable",
            ))
        }
    }
}
