//! Event fan-out with per-handler failure isolation.

use super::{EVENT_ERROR, Event, EventHandler, ListenerTable};
use crate::cache::EntityCache;
use crate::convert::DataConverter;
use crate::error::{ConvertError, EventFailure};
use driftwire_model::Envelope;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::error;

/// Resolves handlers for an envelope and schedules each as an independent
/// task. Reads the listener table and converter; owns neither.
///
/// Failures are not propagated through the call stack: every spawned
/// handler task that returns `Err` reports a structured [`EventFailure`]
/// on the failure channel, and the supervisor re-dispatches it as the
/// reserved `event_error` event.
pub struct Dispatcher {
    listeners: Arc<ListenerTable>,
    converter: Arc<dyn DataConverter>,
    cache: Arc<EntityCache>,
    failures: mpsc::Sender<EventFailure>,
}

impl Dispatcher {
    /// Build a dispatcher over shared registries.
    pub fn new(
        listeners: Arc<ListenerTable>,
        converter: Arc<dyn DataConverter>,
        cache: Arc<EntityCache>,
        failures: mpsc::Sender<EventFailure>,
    ) -> Self {
        Dispatcher {
            listeners,
            converter,
            cache,
            failures,
        }
    }

    /// Dispatch one raw envelope.
    ///
    /// The event name is folded to lowercase, the payload converted, and
    /// every persistent handler followed by every one-shot handler is
    /// scheduled in registration order. A conversion failure aborts this
    /// dispatch call only; the caller logs and moves on to the next
    /// envelope.
    pub fn dispatch(&self, envelope: Envelope) -> Result<(), ConvertError> {
        let name = envelope.name.to_ascii_lowercase();
        let event = self.converter.convert(&name, &envelope.payload)?;
        self.cache.observe(&event);
        self.fan_out(&name, event);
        Ok(())
    }

    /// Dispatch the synthetic `event_error` event for a failed handler.
    /// Bypasses the converter: the failure value is already the argument.
    /// A handler registered for `event_error` that itself fails reports
    /// back through the same channel, unguarded.
    pub fn dispatch_failure(&self, failure: Arc<EventFailure>) {
        self.fan_out(EVENT_ERROR, Event::Failure(failure));
    }

    fn fan_out(&self, name: &str, event: Event) {
        let mut handlers = self.listeners.lookup(name);
        handlers.extend(self.listeners.dequeue_once(name));
        for handler in handlers {
            self.spawn_handler(name.to_string(), handler, event.clone());
        }
    }

    fn spawn_handler(&self, event_name: String, handler: Arc<dyn EventHandler>, event: Event) {
        let failures = self.failures.clone();
        tokio::spawn(async move {
            if let Err(err) = handler.call(event).await {
                let failure = EventFailure {
                    event: event_name,
                    handler: handler.name().to_string(),
                    error: err,
                };
                // A closed channel means the client already shut down;
                // the report has nowhere to go.
                let _ = failures.send(failure).await;
            }
        });
    }
}

/// Default `event_error` handler: logs the handler identity and the full
/// failure chain to the diagnostic stream.
pub struct ErrorLogger;

#[async_trait::async_trait]
impl EventHandler for ErrorLogger {
    fn name(&self) -> &str {
        EVENT_ERROR
    }

    async fn call(&self, event: Event) -> crate::error::HandlerResult {
        if let Event::Failure(failure) = event {
            error!(
                handler = %failure.handler,
                event = %failure.event,
                error = %failure.error,
                "ignoring exception in event handler"
            );
        }
        Ok(())
    }
}
