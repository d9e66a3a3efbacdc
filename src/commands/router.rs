//! The built-in `message_create` handler feeding the command pipeline.

use super::context::Context;
use crate::client::ClientInner;
use crate::error::HandlerResult;
use crate::events::{Event, EventHandler, MESSAGE_CREATE};
use std::sync::{Arc, Weak};

/// Routes message events into parse-and-execute. Installed under
/// `message_create` at client construction; replaceable by registering
/// with `overwrite = true`.
pub struct CommandRouter {
    client: Weak<ClientInner>,
}

impl CommandRouter {
    /// Build a router bound to its supervising client.
    pub(crate) fn new(client: Weak<ClientInner>) -> Self {
        CommandRouter { client }
    }
}

#[async_trait::async_trait]
impl EventHandler for CommandRouter {
    fn name(&self) -> &str {
        MESSAGE_CREATE
    }

    async fn call(&self, event: Event) -> HandlerResult {
        let Event::MessageCreate(message) = event else {
            return Ok(());
        };
        let Some(inner) = self.client.upgrade() else {
            // Client dropped mid-dispatch; nothing to route to.
            return Ok(());
        };

        // Bots never trigger commands, with or without a prefix. This is
        // unconditional: a bot answering bots is a feedback loop.
        if message.author.bot {
            return Ok(());
        }

        let parsed = inner.parser.parse_message(&inner.commands, &message.content);
        let Some(command) = parsed.command else {
            // Not a command; ordinary message traffic.
            return Ok(());
        };

        let ctx = Context {
            client: ClientInner::handle(&inner),
            message,
            command: command.clone(),
        };
        // Errors propagate: the dispatcher reports them as event_error.
        command.execute(ctx, parsed.args).await
    }
}
