use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, Result};

/// The named-event unit exchanged over the websocket, in both directions.
/// Wire: `{ "event": "like_updated", "payload": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    /// `hello` may arrive with no payload at all; everything else is
    /// validated against its typed shape after this first parse.
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn new(event: impl Into<String>, payload: impl Serialize) -> Self {
        Self {
            event: event.into(),
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }

    /// Parse one raw text frame, without interpreting the event name.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(ProtocolError::MalformedFrame)
    }

    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).expect("envelope serialization is infallible")
    }
}
