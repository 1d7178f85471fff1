//! Error types for broker plumbing.

use thiserror::Error;

/// Result alias for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors raised while talking to the message broker.
#[derive(Debug, Error)]
pub enum QueueError {
    /// A broker operation failed.
    #[error("broker operation `{operation}` failed")]
    Broker {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying AMQP error.
        #[source]
        source: lapin::Error,
    },
}

pub(crate) fn map_broker_err(operation: &'static str) -> impl FnOnce(lapin::Error) -> QueueError {
    move |source| QueueError::Broker { operation, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn broker_error_names_the_operation() {
        let err = map_broker_err("declare queue")(lapin::Error::InvalidChannelState(
            lapin::ChannelState::Closed,
        ));
        assert_eq!(err.to_string(), "broker operation `declare queue` failed");
        assert!(err.source().is_some());
    }
}
