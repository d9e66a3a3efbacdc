//! Event model and dispatch.
//!
//! Inbound envelopes are converted into [`Event`] values and fanned out to
//! registered [`EventHandler`]s. Two event names are reserved and get
//! built-in handlers at client construction: `message_create` (routes to
//! the command pipeline) and `event_error` (logs handler failures). Both
//! can be replaced by registering with `overwrite = true`.

mod dispatch;
mod registry;

pub use dispatch::{Dispatcher, ErrorLogger};
pub use registry::ListenerTable;

use crate::error::{EventFailure, HandlerResult};
use driftwire_model::{Account, Guild, Message};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Reserved event name: routes to the command pipeline.
pub const MESSAGE_CREATE: &str = "message_create";
/// Reserved event name: carries handler failures.
pub const EVENT_ERROR: &str = "event_error";
/// Event name for the initial session-ready payload.
pub const READY: &str = "ready";
/// Event name for guild availability.
pub const GUILD_CREATE: &str = "guild_create";

/// A converted inbound event, as delivered to handlers.
#[derive(Debug, Clone)]
pub enum Event {
    /// The session finished identifying; carries the account.
    Ready(Account),
    /// A message was posted.
    MessageCreate(Message),
    /// A guild became available.
    GuildCreate(Guild),
    /// Synthetic event carrying a failed handler invocation.
    Failure(Arc<EventFailure>),
    /// An event the converter has no typed mapping for.
    Unknown {
        /// Normalized event name.
        name: String,
        /// Raw payload.
        payload: serde_json::Value,
    },
}

impl Event {
    /// Normalized event name this value dispatches under.
    pub fn name(&self) -> &str {
        match self {
            Event::Ready(_) => READY,
            Event::MessageCreate(_) => MESSAGE_CREATE,
            Event::GuildCreate(_) => GUILD_CREATE,
            Event::Failure(_) => EVENT_ERROR,
            Event::Unknown { name, .. } => name,
        }
    }
}

/// How a handler runs. Only [`HandlerKind::Async`] handlers are accepted;
/// a handler that would block the dispatch task must be wrapped in a
/// spawn-blocking adapter by its author before registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Cooperatively suspending; safe to run on the dispatch runtime.
    Async,
    /// Blocking; rejected at registration time.
    Blocking,
}

/// Capability interface all registrable event handlers implement.
///
/// `name()` doubles as the default event name when registration omits one,
/// and as the identity attached to failures reported via `event_error`.
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    /// Declared identity of this handler.
    fn name(&self) -> &str;

    /// Execution capability. The registry rejects [`HandlerKind::Blocking`].
    fn kind(&self) -> HandlerKind {
        HandlerKind::Async
    }

    /// Handle one event.
    async fn call(&self, event: Event) -> HandlerResult;
}

type BoxFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// Adapter giving a plain async closure a handler identity.
pub struct FnHandler {
    name: String,
    f: Box<dyn Fn(Event) -> BoxFuture + Send + Sync>,
}

#[async_trait::async_trait]
impl EventHandler for FnHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, event: Event) -> HandlerResult {
        (self.f)(event).await
    }
}

/// Wrap an async closure as a named [`EventHandler`].
pub fn handler<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn EventHandler>
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(FnHandler {
        name: name.into(),
        f: Box::new(move |event| Box::pin(f(event))),
    })
}
