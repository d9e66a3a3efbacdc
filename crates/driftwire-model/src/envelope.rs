//! The raw inbound event unit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event as received from the gateway: a type tag plus an opaque
/// payload. Consumed exactly once by dispatch, never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event type tag, e.g. `MESSAGE_CREATE`. Dispatch folds it to
    /// lowercase; the envelope keeps whatever the wire said.
    #[serde(rename = "t")]
    pub name: String,
    /// Opaque payload handed to the data converter.
    #[serde(rename = "d")]
    pub payload: Value,
}

impl Envelope {
    /// Build an envelope from a type tag and payload.
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Envelope {
            name: name.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_the_wire_frame_shape() {
        let env: Envelope =
            serde_json::from_str(r#"{"t": "MESSAGE_CREATE", "d": {"content": "hi"}}"#).unwrap();
        assert_eq!(env.name, "MESSAGE_CREATE");
        assert_eq!(env.payload, json!({"content": "hi"}));
    }
}
