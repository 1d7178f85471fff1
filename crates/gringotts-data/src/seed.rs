//! Deterministic fixture data for bootstrapping a known test state.

use sqlx::PgPool;
use tracing::info;

use crate::error::Result;
use crate::vaults::{self, NewVault, VaultRow};

/// Owners and opening balances inserted by [`seed`].
pub const SEED_VAULTS: [(&str, i64); 3] = [
    ("Harry Potter", 50_000),
    ("Weasley Family", 2),
    ("Ministry of Magic", 1_000_000),
];

/// Load the fixture vaults, returning the stored rows in seed order.
///
/// Assumes a freshly reset schema; the rows are inserted as-is, so running it
/// twice duplicates owners.
///
/// # Errors
///
/// Returns an error when any insert fails.
pub async fn seed(pool: &PgPool) -> Result<Vec<VaultRow>> {
    let mut rows = Vec::with_capacity(SEED_VAULTS.len());
    for (owner, galleons) in SEED_VAULTS {
        let row = vaults::insert_vault(pool, &NewVault { owner, galleons }).await?;
        rows.push(row);
    }
    info!(vaults = rows.len(), "seed data loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_registry_has_unique_owners() {
        let mut owners: Vec<&str> = SEED_VAULTS.iter().map(|(owner, _)| *owner).collect();
        owners.sort_unstable();
        owners.dedup();
        assert_eq!(owners.len(), SEED_VAULTS.len());
    }
}
