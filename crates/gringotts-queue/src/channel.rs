//! Broker connection and channel helpers.
//!
//! There is no retry or backoff here: a failed channel open is a hard setup
//! failure that propagates to the caller.

use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::debug;

use gringotts_config::AmqpSettings;

use crate::error::{QueueResult, map_broker_err};

/// Open a broker connection from process settings.
///
/// # Errors
///
/// Returns an error when the broker is unreachable or rejects the handshake.
pub async fn connect(settings: &AmqpSettings) -> QueueResult<Connection> {
    let connection = Connection::connect(&settings.url, ConnectionProperties::default())
        .await
        .map_err(map_broker_err("connect"))?;
    debug!("broker connection established");
    Ok(connection)
}

/// Open a channel and declare the durable work queue on it.
///
/// The channel is ready for publish and consume once this returns; the
/// declare is idempotent for matching queue arguments.
///
/// # Errors
///
/// Returns an error when the connection, channel, or declare fails.
pub async fn create_queue_channel(settings: &AmqpSettings) -> QueueResult<Channel> {
    let connection = connect(settings).await?;
    let channel = connection
        .create_channel()
        .await
        .map_err(map_broker_err("create channel"))?;
    channel
        .queue_declare(
            &settings.queue,
            QueueDeclareOptions {
                durable: true,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_err("declare queue"))?;
    debug!(queue = %settings.queue, "work queue declared");
    Ok(channel)
}

/// Publish a payload to a queue via the default exchange.
///
/// # Errors
///
/// Returns an error when the publish or its confirmation fails.
pub async fn publish(channel: &Channel, queue: &str, payload: &[u8]) -> QueueResult<()> {
    channel
        .basic_publish(
            "",
            queue,
            BasicPublishOptions::default(),
            payload,
            BasicProperties::default(),
        )
        .await
        .map_err(map_broker_err("publish"))?
        .await
        .map_err(map_broker_err("publish confirm"))?;
    Ok(())
}
