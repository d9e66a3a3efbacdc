//! Gateway collaborator: session establishment and the envelope stream.
//!
//! The supervisor treats the gateway as opaque: a [`Connector`] opens a
//! fresh [`Session`] per attempt (never reused across reconnects), and a
//! session yields envelopes until it ends. The default implementation
//! speaks JSON frames over a websocket; tests substitute scripted fakes.

mod ws;

pub use ws::WsConnector;

use crate::error::GatewayError;
use crate::intents::Intents;
use async_trait::async_trait;
use driftwire_model::Envelope;

/// One live gateway connection.
#[async_trait]
pub trait Session: Send {
    /// Receive the next envelope. `Ok(None)` means the session ended
    /// cleanly; an error means it broke. Either way the supervisor falls
    /// back to the reconnect loop.
    async fn next_envelope(&mut self) -> Result<Option<Envelope>, GatewayError>;

    /// Close the session.
    async fn close(&mut self) -> Result<(), GatewayError>;
}

/// Opens sessions. A brand-new session is constructed per attempt.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish and identify a session against `url`.
    async fn connect(
        &self,
        url: &str,
        token: &str,
        intents: Intents,
    ) -> Result<Box<dyn Session>, GatewayError>;
}
