//! Integration test common infrastructure.
//!
//! Provides in-process fakes for the REST and gateway collaborators plus
//! helpers for building clients and scripted event streams.

pub mod gateway;
pub mod rest;

#[allow(unused_imports)]
pub use gateway::{FakeConnector, SessionScript};
#[allow(unused_imports)]
pub use rest::FakeRest;

use driftwire::convert::JsonConverter;
use driftwire::{Client, ClientConfig, Envelope};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Install a subscriber once so failing tests show the client's logs.
#[allow(dead_code)]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration tuned for tests: deterministic backoff, tiny delays.
pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.connection.connect_timeout_secs = 5;
    config.connection.reconnect_delay_ms = 10;
    config.connection.reconnect_jitter_ms = 0;
    config
}

/// A client wired to fakes, plus handles to inspect them.
#[allow(dead_code)]
pub fn build_client(
    config: ClientConfig,
    scripts: Vec<SessionScript>,
) -> (Client, Arc<FakeRest>, Arc<FakeConnector>) {
    let rest = Arc::new(FakeRest::new());
    let connector = Arc::new(FakeConnector::new(scripts));
    let client = Client::with_collaborators(
        config,
        rest.clone(),
        connector.clone(),
        Arc::new(JsonConverter),
    );
    (client, rest, connector)
}

/// A `message_create` envelope from a human author.
#[allow(dead_code)]
pub fn message_envelope(channel: u64, author: &str, content: &str) -> Envelope {
    authored_envelope(channel, author, false, content)
}

/// A `message_create` envelope with explicit bot authorship.
#[allow(dead_code)]
pub fn authored_envelope(channel: u64, author: &str, bot: bool, content: &str) -> Envelope {
    Envelope::new(
        "MESSAGE_CREATE",
        json!({
            "id": "100200300",
            "channel_id": channel.to_string(),
            "author": {
                "id": "42",
                "username": author,
                "bot": bot,
            },
            "content": content,
        }),
    )
}

/// Poll `condition` until it holds or the deadline passes.
#[allow(dead_code)]
pub async fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
