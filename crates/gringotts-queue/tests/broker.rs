//! Broker round-trip tests; skipped when no broker is listening.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use lapin::options::{BasicGetOptions, QueueDeclareOptions, QueueDeleteOptions};
use lapin::types::FieldTable;

use gringotts_queue::publish;
use gringotts_test_support::queue::{broker_available, goblin_channel};

fn scratch_queue_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("gringotts.test.{}.{nanos}", std::process::id())
}

#[tokio::test]
async fn channel_opens_and_round_trips_a_payload() -> Result<()> {
    if !broker_available() {
        eprintln!("skipping broker tests: no broker reachable");
        return Ok(());
    }

    let channel = goblin_channel().await?;

    // A throwaway queue keeps the round trip isolated from real workers.
    let queue = scratch_queue_name();
    channel
        .queue_declare(
            &queue,
            QueueDeclareOptions {
                auto_delete: true,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await
        .context("failed to declare scratch queue")?;

    publish(&channel, &queue, b"open vault 713").await?;

    let delivery = channel
        .basic_get(
            &queue,
            BasicGetOptions {
                no_ack: true,
                ..BasicGetOptions::default()
            },
        )
        .await
        .context("failed to fetch message")?
        .context("expected a message on the scratch queue")?;
    assert_eq!(delivery.data, b"open vault 713");

    channel
        .queue_delete(&queue, QueueDeleteOptions::default())
        .await
        .context("failed to delete scratch queue")?;
    Ok(())
}
