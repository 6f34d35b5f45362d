//! Request/response payloads for the HTTP side of the protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored message returned by the room history call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Server-assigned message ID.
    pub id: String,
    /// Username of the author.
    pub sender: String,
    /// Message body.
    pub content: String,
    /// Server-side timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Room record from the directory calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Room identifier.
    pub id: String,
    /// Display name of the room.
    pub name: String,
    /// Username that created the room, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Registered username record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The registered username.
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_history_record() {
        let record: HistoryMessage = serde_json::from_str(
            r#"{"id":"7","sender":"alice","content":"hi","timestamp":"2024-03-01T10:15:00Z"}"#,
        )
        .unwrap();

        assert_eq!(record.id, "7");
        assert_eq!(record.sender, "alice");
    }

    #[test]
    fn parses_room_without_creator() {
        let room: RoomInfo = serde_json::from_str(r#"{"id":"r1","name":"general"}"#).unwrap();
        assert_eq!(room.created_by, None);
    }
}
