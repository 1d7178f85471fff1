//! Shared application state for the HTTP surface.

use sqlx::PgPool;

/// Dependencies shared by every handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Process-wide async connection pool.
    pub pool: PgPool,
}

impl ApiState {
    /// Wrap the shared pool for handler access.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
