//! Per-invocation command context.

use super::core::Command;
use crate::client::ClientHandle;
use crate::error::HandlerError;
use driftwire_model::Message;
use std::sync::Arc;

/// Ephemeral context created once per matched message: the originating
/// message, the resolved command, and a back-reference to the client.
/// Dropped when the command body returns.
#[derive(Clone)]
pub struct Context {
    /// Back-reference to the supervising client.
    pub client: ClientHandle,
    /// The message that triggered the command.
    pub message: Message,
    /// The resolved command.
    pub command: Arc<Command>,
}

impl Context {
    /// Reply in the channel the triggering message came from.
    pub async fn reply(&self, text: &str) -> Result<(), HandlerError> {
        self.client
            .send_message(self.message.channel_id, text)
            .await
            .map_err(|e| HandlerError::Client(e.to_string()))
    }
}
