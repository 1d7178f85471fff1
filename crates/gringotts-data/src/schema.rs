//! Schema lifecycle: the table registry plus destructive and non-destructive
//! bootstrap paths.
//!
//! The registry is the single source of truth for application DDL. Statements
//! are written with `IF NOT EXISTS` so both [`ensure_schema`] (startup) and
//! [`reset_schema`] (test setup) share it.

use sqlx::PgPool;
use tracing::info;

use gringotts_config::SCHEMA_NAME;

use crate::error::{DataError, Result};

/// Ordered DDL registry for every application table.
///
/// Order matters: later statements reference earlier tables.
#[must_use]
pub fn table_ddl(schema: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {schema}.vaults (\
             id UUID PRIMARY KEY, \
             owner TEXT NOT NULL, \
             galleons BIGINT NOT NULL DEFAULT 0, \
             created_at TIMESTAMPTZ NOT NULL DEFAULT now())"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {schema}.ledger_entries (\
             id UUID PRIMARY KEY, \
             vault_id UUID NOT NULL REFERENCES {schema}.vaults(id) ON DELETE CASCADE, \
             delta BIGINT NOT NULL, \
             note TEXT, \
             recorded_at TIMESTAMPTZ NOT NULL DEFAULT now())"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS ledger_entries_vault_id_idx \
             ON {schema}.ledger_entries (vault_id)"
        ),
    ]
}

/// Create the schema and every registered table if they are missing.
///
/// Non-destructive; safe to run at every startup.
///
/// # Errors
///
/// Returns an error naming the statement that failed.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    execute(pool, &format!("CREATE SCHEMA IF NOT EXISTS {SCHEMA_NAME}")).await?;
    for statement in table_ddl(SCHEMA_NAME) {
        execute(pool, &statement).await?;
    }
    Ok(())
}

/// Drop and recreate the schema and its tables.
///
/// The test-setup routine: every table and row in the namespace is discarded
/// and a fully-formed empty schema is left behind. Any failure propagates to
/// the caller and aborts test setup.
///
/// # Errors
///
/// Returns an error naming the statement that failed.
pub async fn reset_schema(pool: &PgPool) -> Result<()> {
    execute(
        pool,
        &format!("DROP SCHEMA IF EXISTS {SCHEMA_NAME} CASCADE"),
    )
    .await?;
    ensure_schema(pool).await?;
    info!(schema = SCHEMA_NAME, "schema reset");
    Ok(())
}

async fn execute(pool: &PgPool, statement: &str) -> Result<()> {
    sqlx::query(statement)
        .execute(pool)
        .await
        .map_err(|source| DataError::SchemaFailed {
            statement: statement.to_string(),
            source,
        })?;
    Ok(())
}
