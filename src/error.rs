//! Unified error handling for driftwire.
//!
//! Each concern gets its own error enum; [`ClientError`] is the top-level
//! type surfaced by the supervisor. Per-handler failures never appear here:
//! they are wrapped in [`EventFailure`] and re-dispatched as the reserved
//! `event_error` event instead of unwinding the receive loop.

use thiserror::Error;

// ============================================================================
// REST layer
// ============================================================================

/// Errors from the REST collaborator.
#[derive(Debug, Error)]
pub enum RestError {
    /// The platform rejected the supplied token.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response decoded, but not into the shape we expect.
    #[error("malformed response: {0}")]
    Malformed(String),
}

// ============================================================================
// Gateway session
// ============================================================================

/// Errors from the gateway session collaborator. All of these are absorbed
/// by the supervisor's reconnect loop; user code never sees them.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Session establishment failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The connection attempt exceeded the configured timeout.
    #[error("connection attempt timed out")]
    Timeout,

    /// The remote sent a frame we could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Websocket transport failure.
    #[error("websocket error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
}

// ============================================================================
// Payload conversion
// ============================================================================

/// Conversion of a raw payload into a typed event failed. Aborts only the
/// dispatch call for that one envelope.
#[derive(Debug, Error)]
#[error("malformed {event} payload: {source}")]
pub struct ConvertError {
    /// Normalized event name the payload arrived under.
    pub event: String,
    /// Underlying decode failure.
    #[source]
    pub source: serde_json::Error,
}

// ============================================================================
// Handler and command failures
// ============================================================================

/// Failure raised while running a registered handler or command body.
/// Isolated per handler and reported via the `event_error` event.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A command body failed.
    #[error("command failed: {0}")]
    Command(String),

    /// A declared positional parameter was not supplied.
    #[error("missing argument: {0}")]
    MissingArgument(String),

    /// A reply or other client call from inside a handler failed.
    #[error("client call failed: {0}")]
    Client(String),

    /// Anything else user code wants to surface.
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    /// Wrap an arbitrary displayable failure.
    pub fn other(err: impl std::fmt::Display) -> Self {
        HandlerError::Other(err.to_string())
    }
}

/// Result type for event handlers and command bodies.
pub type HandlerResult = Result<(), HandlerError>;

/// Structured record of one failed handler invocation: the event it fired
/// for, the offending handler's identity, and the original error. Carried
/// by the synthetic `event_error` event.
#[derive(Debug, Error)]
#[error("handler {handler} failed for event {event}: {error}")]
pub struct EventFailure {
    /// Normalized name of the event being dispatched.
    pub event: String,
    /// Identity of the handler that failed.
    pub handler: String,
    /// The failure itself.
    #[source]
    pub error: HandlerError,
}

// ============================================================================
// Registration-time programmer errors
// ============================================================================

/// Listener registration errors. Raised at the call site during setup,
/// never at dispatch time.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The handler declares it does not support cooperative suspension.
    #[error("handler {0:?} is not an async handler; blocking handlers are rejected at registration")]
    InvalidHandlerKind(String),
}

/// Command registration errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A command with this plain name already exists.
    #[error("duplicate command name: {0}")]
    Duplicate(String),

    /// Unregistering a name that was never registered.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// A pattern command carried an invalid regex.
    #[error("invalid command pattern: {0}")]
    Pattern(#[from] regex::Error),
}

// ============================================================================
// Supervisor
// ============================================================================

/// Top-level client errors. Only configuration problems and first-login
/// auth failures are expected to terminate a run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured capability flags contain unrecognized bits. Raised
    /// before any network I/O.
    #[error("invalid capability flags: {0:#x} contains unrecognized bits")]
    InvalidIntents(u64),

    /// Configuration file problem.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Login was rejected.
    #[error("authentication failed: {0}")]
    Auth(#[source] RestError),

    /// Non-auth REST failure.
    #[error("rest error: {0}")]
    Rest(#[from] RestError),

    /// Gateway failure surfaced outside the reconnect loop.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// `connect` was called before a successful `login`.
    #[error("not authenticated; call login first")]
    NotAuthenticated,

    /// The client has been closed.
    #[error("client is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_failure_formats_handler_identity_and_cause() {
        let failure = EventFailure {
            event: "message_create".into(),
            handler: "boom".into(),
            error: HandlerError::Command("nope".into()),
        };
        let text = failure.to_string();
        assert!(text.contains("boom"));
        assert!(text.contains("message_create"));
        assert!(text.contains("nope"));
    }

    #[test]
    fn invalid_intents_displays_offending_bits() {
        let err = ClientError::InvalidIntents(0xdead_0000);
        assert!(err.to_string().contains("0xdead0000"));
    }
}
