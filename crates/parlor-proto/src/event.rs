//! Stream frame types.
//!
//! One JSON object per WebSocket text frame, tagged by `event`. Inbound
//! frames ([`ServerEvent`]) and outbound frames ([`ClientFrame`]) are
//! separate types: the server sends `message`/`join`/`leave`, the client
//! only ever sends `message`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding or encoding stream frames.
#[derive(Debug, Error)]
pub enum WireError {
    /// Frame was not valid JSON or did not match any known event shape.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Inbound event delivered on the room stream.
///
/// `message` frames may omit `id` and `timestamp`; older server builds only
/// fill them for messages relayed from other members. Receivers substitute
/// local values when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ServerEvent {
    /// A chat message relayed to the room.
    Message {
        /// Username of the author.
        sender: String,
        /// Message body.
        content: String,
        /// Server-assigned message ID, when provided.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Server-side timestamp, when provided.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },

    /// A member joined the room.
    Join {
        /// Username of the member who joined.
        username: String,
    },

    /// A member left the room.
    Leave {
        /// Username of the member who left.
        username: String,
    },
}

impl ServerEvent {
    /// Decode a text frame into a [`ServerEvent`].
    pub fn decode(text: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Outbound frame sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ClientFrame {
    /// Send a chat message to the room.
    Message {
        /// Message body.
        content: String,
    },
}

impl ClientFrame {
    /// Encode this frame as a JSON text frame.
    pub fn encode(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }
}
