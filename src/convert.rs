//! Payload conversion from raw envelopes to typed events.

use crate::error::ConvertError;
use crate::events::{Event, GUILD_CREATE, MESSAGE_CREATE, READY};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Converts a (normalized event name, raw payload) pair into the typed
/// argument delivered to handlers. Deterministic and side-effect free;
/// a failure aborts just the dispatch call that triggered it.
pub trait DataConverter: Send + Sync {
    /// Convert one payload.
    fn convert(&self, event: &str, payload: &Value) -> Result<Event, ConvertError>;
}

/// Default converter backed by serde.
///
/// Events without a typed mapping come through as [`Event::Unknown`] so
/// user handlers registered for them still fire.
pub struct JsonConverter;

impl JsonConverter {
    fn decode<T: DeserializeOwned>(event: &str, payload: &Value) -> Result<T, ConvertError> {
        serde_json::from_value(payload.clone()).map_err(|source| ConvertError {
            event: event.to_string(),
            source,
        })
    }
}

impl DataConverter for JsonConverter {
    fn convert(&self, event: &str, payload: &Value) -> Result<Event, ConvertError> {
        let converted = match event {
            READY => Event::Ready(Self::decode(event, payload)?),
            MESSAGE_CREATE => Event::MessageCreate(Self::decode(event, payload)?),
            GUILD_CREATE => Event::GuildCreate(Self::decode(event, payload)?),
            _ => Event::Unknown {
                name: event.to_string(),
                payload: payload.clone(),
            },
        };
        Ok(converted)
    }
}
