//! Schema lifecycle and repository tests against a disposable database.

use std::future::Future;

use anyhow::{Context, Result};
use sqlx::PgPool;

use gringotts_data::seed::{SEED_VAULTS, seed};
use gringotts_data::vaults::{self, NewVault};
use gringotts_data::{connect_pool, dispose, reset_schema};
use gringotts_test_support::postgres;

async fn with_database<F, Fut>(test: F) -> Result<()>
where
    F: FnOnce(PgPool) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    if !postgres::available() {
        eprintln!("skipping database tests: no postgres available");
        return Ok(());
    }

    let db = postgres::provision().await?;
    let pool = connect_pool(db.connection_string())
        .await
        .context("failed to connect test pool")?;

    let result = test(pool.clone()).await;

    dispose(&pool).await;
    db.close().await?;
    result
}

#[tokio::test]
async fn reset_leaves_a_usable_empty_schema() -> Result<()> {
    with_database(|pool| async move {
        reset_schema(&pool).await?;
        let rows = vaults::list_vaults(&pool).await?;
        assert!(rows.is_empty());

        let row = vaults::insert_vault(
            &pool,
            &NewVault {
                owner: "Fleur Delacour",
                galleons: 120,
            },
        )
        .await?;
        assert_eq!(row.owner, "Fleur Delacour");
        assert_eq!(row.galleons, 120);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn reset_is_idempotent_and_discards_rows() -> Result<()> {
    with_database(|pool| async move {
        reset_schema(&pool).await?;
        vaults::insert_vault(
            &pool,
            &NewVault {
                owner: "Mundungus Fletcher",
                galleons: 7,
            },
        )
        .await?;

        reset_schema(&pool).await?;
        reset_schema(&pool).await?;
        let rows = vaults::list_vaults(&pool).await?;
        assert!(rows.is_empty(), "reset must discard existing rows");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn seed_loads_the_fixture_vaults() -> Result<()> {
    with_database(|pool| async move {
        reset_schema(&pool).await?;
        let seeded = seed(&pool).await?;
        assert_eq!(seeded.len(), SEED_VAULTS.len());

        let rows = vaults::list_vaults(&pool).await?;
        let owners: Vec<&str> = rows.iter().map(|row| row.owner.as_str()).collect();
        let expected: Vec<&str> = SEED_VAULTS.iter().map(|(owner, _)| *owner).collect();
        assert_eq!(owners, expected, "seed order must be preserved");

        for ((_, galleons), row) in SEED_VAULTS.iter().zip(&rows) {
            assert_eq!(row.galleons, *galleons);
        }
        Ok(())
    })
    .await
}

#[tokio::test]
async fn ledger_entries_move_galleons() -> Result<()> {
    with_database(|pool| async move {
        reset_schema(&pool).await?;
        let vault = vaults::insert_vault(
            &pool,
            &NewVault {
                owner: "Harry Potter",
                galleons: 100,
            },
        )
        .await?;

        let entry =
            vaults::record_ledger_entry(&pool, vault.id, 50, Some("triwizard winnings")).await?;
        assert_eq!(entry.vault_id, vault.id);
        assert_eq!(entry.delta, 50);

        vaults::record_ledger_entry(&pool, vault.id, -70, None).await?;
        let balance = vaults::fetch_balance(&pool, vault.id).await?;
        assert_eq!(balance, Some(80));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn missing_vault_reads_as_none() -> Result<()> {
    with_database(|pool| async move {
        reset_schema(&pool).await?;
        let missing = vaults::fetch_vault(&pool, uuid::Uuid::new_v4()).await?;
        assert!(missing.is_none());
        let balance = vaults::fetch_balance(&pool, uuid::Uuid::new_v4()).await?;
        assert!(balance.is_none());
        Ok(())
    })
    .await
}
