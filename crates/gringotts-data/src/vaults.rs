//! Vault and ledger repositories.

use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::error::{DataError, Result};

fn map_query_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DataError {
    move |source| DataError::QueryFailed { operation, source }
}

/// Raw projection of the `vaults` table.
#[derive(Debug, Clone, FromRow)]
pub struct VaultRow {
    /// Primary key for the vault.
    pub id: Uuid,
    /// Name of the account holder.
    pub owner: String,
    /// Current balance in galleons.
    pub galleons: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input payload for opening a vault.
#[derive(Debug, Clone)]
pub struct NewVault<'a> {
    /// Name of the account holder.
    pub owner: &'a str,
    /// Opening balance in galleons.
    pub galleons: i64,
}

/// Raw projection of the `ledger_entries` table.
#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntryRow {
    /// Primary key for the entry.
    pub id: Uuid,
    /// Vault the entry belongs to.
    pub vault_id: Uuid,
    /// Signed balance change in galleons.
    pub delta: i64,
    /// Optional free-form annotation.
    pub note: Option<String>,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Open a vault and return the stored row.
///
/// # Errors
///
/// Returns an error when the insert fails.
pub async fn insert_vault<'e, E>(executor: E, vault: &NewVault<'_>) -> Result<VaultRow>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, VaultRow>(
        "INSERT INTO gringotts.vaults (id, owner, galleons) VALUES ($1, $2, $3) \
         RETURNING id, owner, galleons, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(vault.owner)
    .bind(vault.galleons)
    .fetch_one(executor)
    .await
    .map_err(map_query_err("insert vault"))
}

/// Load a vault by identifier.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_vault<'e, E>(executor: E, id: Uuid) -> Result<Option<VaultRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, VaultRow>(
        "SELECT id, owner, galleons, created_at FROM gringotts.vaults WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(map_query_err("fetch vault"))
}

/// List every vault, oldest first.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn list_vaults<'e, E>(executor: E) -> Result<Vec<VaultRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, VaultRow>(
        "SELECT id, owner, galleons, created_at FROM gringotts.vaults ORDER BY created_at, id",
    )
    .fetch_all(executor)
    .await
    .map_err(map_query_err("list vaults"))
}

/// Record a ledger entry and apply its delta to the vault balance.
///
/// Both statements run in one transaction, so the entry and the balance
/// never diverge.
///
/// # Errors
///
/// Returns an error when either statement fails or the transaction cannot
/// commit.
pub async fn record_ledger_entry(
    pool: &sqlx::PgPool,
    vault_id: Uuid,
    delta: i64,
    note: Option<&str>,
) -> Result<LedgerEntryRow> {
    let mut tx = pool.begin().await.map_err(map_query_err("begin ledger"))?;
    let entry = sqlx::query_as::<_, LedgerEntryRow>(
        "INSERT INTO gringotts.ledger_entries (id, vault_id, delta, note) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, vault_id, delta, note, recorded_at",
    )
    .bind(Uuid::new_v4())
    .bind(vault_id)
    .bind(delta)
    .bind(note)
    .fetch_one(tx.as_mut())
    .await
    .map_err(map_query_err("insert ledger entry"))?;
    sqlx::query("UPDATE gringotts.vaults SET galleons = galleons + $1 WHERE id = $2")
        .bind(delta)
        .bind(vault_id)
        .execute(tx.as_mut())
        .await
        .map_err(map_query_err("apply ledger delta"))?;
    tx.commit().await.map_err(map_query_err("commit ledger"))?;
    Ok(entry)
}

/// Fetch the current balance for a vault.
///
/// # Errors
///
/// Returns an error when the query fails.
pub async fn fetch_balance<'e, E>(executor: E, vault_id: Uuid) -> Result<Option<i64>>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, i64>("SELECT galleons FROM gringotts.vaults WHERE id = $1")
        .bind(vault_id)
        .fetch_optional(executor)
        .await
        .map_err(map_query_err("fetch balance"))
}

// Keeps FromRow derives honest without a live database.
#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgRow;

    fn assert_from_row_impls<'r, T: FromRow<'r, PgRow>>() {}

    #[test]
    fn row_projections_derive_from_row() {
        assert_from_row_impls::<VaultRow>();
        assert_from_row_impls::<LedgerEntryRow>();
    }
}
