//! Broker channel fixture.

use std::net::TcpStream;
use std::time::Duration;

use anyhow::{Context, Result};
use lapin::Channel;
use url::Url;

use gringotts_config::settings;
use gringotts_queue::create_queue_channel;

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);
const DEFAULT_AMQP_PORT: u16 = 5672;

/// Open a channel to the message broker using process settings.
///
/// The work queue is declared on the channel before it is returned, so tests
/// can publish and consume immediately.
///
/// # Errors
///
/// Returns an error when settings cannot be read or the broker rejects the
/// connection; either aborts test setup.
pub async fn goblin_channel() -> Result<Channel> {
    let settings = settings().context("failed to load process settings")?;
    create_queue_channel(&settings.amqp)
        .await
        .context("failed to open broker channel")
}

/// Returns `true` if the configured broker accepts TCP connections.
///
/// A cheap probe so suites can skip broker tests on hosts without one.
#[must_use]
pub fn broker_available() -> bool {
    settings()
        .ok()
        .is_some_and(|settings| endpoint_reachable(&settings.amqp.url))
}

fn endpoint_reachable(amqp_url: &str) -> bool {
    use std::net::ToSocketAddrs;

    let Ok(parsed) = Url::parse(amqp_url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let port = parsed.port().unwrap_or(DEFAULT_AMQP_PORT);
    (host, port).to_socket_addrs().is_ok_and(|mut addrs| {
        addrs.any(|addr| TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_urls_are_unreachable() {
        assert!(!endpoint_reachable("not a url"));
        assert!(!endpoint_reachable("amqp://"));
    }

    #[test]
    fn closed_ports_are_unreachable() {
        // Port 1 is virtually never listening locally.
        assert!(!endpoint_reachable("amqp://127.0.0.1:1/%2f"));
    }
}
