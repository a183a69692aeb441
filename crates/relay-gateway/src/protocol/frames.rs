//! Wire frames
//!
//! Frames are JSON envelopes with a named event, a payload, and an optional
//! ack id. When a client frame carries an ack id, the server answers on the
//! same connection with a frame echoing that id and an ack payload of
//! `{status: 1|0, message?, data?}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frame received from a client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    /// Event name (e.g. "join-chat", "message")
    pub event: String,

    /// Event payload
    #[serde(default)]
    pub data: Value,

    /// Client-assigned ack id; present when the client expects a callback
    #[serde(default)]
    pub ack: Option<u64>,
}

impl ClientFrame {
    /// Parse a frame from JSON text
    ///
    /// # Errors
    /// Returns an error if the text is not a valid frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Frame sent to a client
#[derive(Debug, Clone, Serialize)]
pub struct ServerFrame {
    pub event: String,

    pub data: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
}

impl ServerFrame {
    /// Create an event frame (broadcast or direct emit)
    #[must_use]
    pub fn event(event: &str, data: Value) -> Self {
        Self {
            event: event.to_string(),
            data,
            ack: None,
        }
    }

    /// Create an ack frame answering a client frame
    #[must_use]
    pub fn ack(event: &str, ack_id: u64, payload: AckPayload) -> Self {
        Self {
            event: event.to_string(),
            data: serde_json::to_value(payload).unwrap_or(Value::Null),
            ack: Some(ack_id),
        }
    }

    /// Serialize the frame to JSON text
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Ack payload mirroring the callback contract: status 1 on success, 0 on
/// failure with a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckPayload {
    pub status: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl AckPayload {
    /// Successful ack without a payload
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: 1,
            message: None,
            data: None,
        }
    }

    /// Successful ack carrying a payload
    #[must_use]
    pub fn ok_with(data: Value) -> Self {
        Self {
            status: 1,
            message: None,
            data: Some(data),
        }
    }

    /// Failed ack with an error message
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: Some(message.into()),
            data: None,
        }
    }
}
