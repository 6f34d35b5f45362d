//! Chat message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a transcript entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// A chat message written by a member.
    Text,
    /// A member joined the room.
    Join,
    /// A member left the room.
    Leave,
}

impl MessageKind {
    /// True for `Join`/`Leave` entries.
    #[must_use]
    pub fn is_presence(self) -> bool {
        matches!(self, Self::Join | Self::Leave)
    }
}

/// Whether a message has been confirmed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageOrigin {
    /// Relayed or stored by the server.
    Confirmed,
    /// Local optimistic echo awaiting its server confirmation.
    PendingLocal,
}

/// One immutable transcript entry.
///
/// `id` is unique within a room: server-assigned for confirmed messages,
/// locally generated for pending echoes and synthesized presence entries.
/// Display order is derived by sorting on `timestamp` (ties broken by
/// insertion order inside [`crate::Transcript`]), never by arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID within the room.
    pub id: String,
    /// Entry kind.
    pub kind: MessageKind,
    /// Username of the author. Empty for presence entries.
    pub sender: String,
    /// Display-ready body.
    pub content: String,
    /// Timestamp used for display ordering.
    pub timestamp: DateTime<Utc>,
    /// Confirmation state.
    pub origin: MessageOrigin,
}

impl Message {
    /// Build a server-confirmed text message.
    pub fn confirmed(
        id: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: MessageKind::Text,
            sender: sender.into(),
            content: content.into(),
            timestamp,
            origin: MessageOrigin::Confirmed,
        }
    }

    /// True for `Join`/`Leave` entries.
    #[must_use]
    pub fn is_presence(&self) -> bool {
        self.kind.is_presence()
    }

    /// True while this entry is an optimistic local echo.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.origin == MessageOrigin::PendingLocal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_detection() {
        assert!(MessageKind::Join.is_presence());
        assert!(MessageKind::Leave.is_presence());
        assert!(!MessageKind::Text.is_presence());
    }

    #[test]
    fn confirmed_constructor_sets_origin() {
        let message = Message::confirmed("1", "alice", "hi", Utc::now());
        assert_eq!(message.origin, MessageOrigin::Confirmed);
        assert_eq!(message.kind, MessageKind::Text);
        assert!(!message.is_pending());
    }
}
