//! Room transcript reconciliation.
//!
//! A [`Transcript`] is the single source of truth for one room session. It
//! merges two feeds into one log: the one-shot history fetch (seed) and the
//! live event stream (inbound), plus the optimistic echoes of messages the
//! local user sends (outbound). The merge is idempotent per message ID, so
//! any interleaving of history arrival and live delivery yields exactly one
//! entry per distinct message.
//!
//! Entries are kept in arrival order; [`Transcript::snapshot`] sorts by
//! (timestamp, arrival sequence). The sequence tie-break keeps equal
//! timestamps stable across snapshots.

use chrono::{DateTime, Utc};
use parlor_proto::ServerEvent;

use crate::message::{Message, MessageKind, MessageOrigin};

/// What [`Transcript::apply_inbound`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Appended as a new entry.
    Inserted,
    /// Replaced the oldest matching pending-local echo.
    Confirmed,
    /// Dropped: an entry with this ID already exists.
    Duplicate,
}

#[derive(Debug, Clone)]
struct Entry {
    /// Arrival sequence, monotonic per transcript. Tie-break for display.
    seq: u64,
    message: Message,
}

/// Ordered, deduplicated message log for one room session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_seq: u64,
    next_local_id: u64,
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries still awaiting server confirmation.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.message.is_pending()).count()
    }

    /// Merge the historical messages into the log.
    ///
    /// Safe to call at any point relative to live delivery: entries whose ID
    /// is already present are dropped, the rest are inserted. Returns how
    /// many entries were inserted.
    pub fn seed(&mut self, history: impl IntoIterator<Item = Message>) -> usize {
        let mut inserted = 0;
        for message in history {
            if self.contains_id(&message.id) {
                continue;
            }
            self.push(message);
            inserted += 1;
        }
        inserted
    }

    /// Merge one live stream event into the log.
    ///
    /// `received_at` is the local arrival time, used when the event carries
    /// no server timestamp.
    ///
    /// Message events confirm the oldest pending-local echo with the same
    /// sender and content when one exists; otherwise they append. Matching
    /// is by sender + content, so two identical messages in flight at once
    /// are confirmed in send order regardless of which echo the server
    /// relays first. Presence events always append; the server never echoes
    /// them back to their origin.
    pub fn apply_inbound(&mut self, event: ServerEvent, received_at: DateTime<Utc>) -> MergeOutcome {
        match event {
            ServerEvent::Message { sender, content, id, timestamp } => {
                if let Some(id) = &id
                    && self.contains_id(id)
                {
                    return MergeOutcome::Duplicate;
                }

                let message = Message {
                    id: id.unwrap_or_else(|| self.alloc_local_id()),
                    kind: MessageKind::Text,
                    sender,
                    content,
                    timestamp: timestamp.unwrap_or(received_at),
                    origin: MessageOrigin::Confirmed,
                };

                // Entries are stored in arrival order, so the first match is
                // the oldest unconfirmed echo.
                let pending = self.entries.iter().position(|e| {
                    e.message.is_pending()
                        && e.message.sender == message.sender
                        && e.message.content == message.content
                });

                match pending {
                    Some(index) => {
                        self.entries[index].message = message;
                        MergeOutcome::Confirmed
                    },
                    None => {
                        self.push(message);
                        MergeOutcome::Inserted
                    },
                }
            },
            ServerEvent::Join { username } => {
                self.push_presence(MessageKind::Join, &username, "joined", received_at);
                MergeOutcome::Inserted
            },
            ServerEvent::Leave { username } => {
                self.push_presence(MessageKind::Leave, &username, "left", received_at);
                MergeOutcome::Inserted
            },
        }
    }

    /// Append an optimistic echo for a message the local user is sending.
    ///
    /// The entry is visible immediately with a locally generated ID and the
    /// provided local time, and stays visible until a matching inbound
    /// event confirms it. It is never dropped silently if confirmation
    /// never arrives.
    pub fn apply_outbound(
        &mut self,
        sender: impl Into<String>,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Message {
        let message = Message {
            id: self.alloc_local_id(),
            kind: MessageKind::Text,
            sender: sender.into(),
            content: content.into(),
            timestamp: at,
            origin: MessageOrigin::PendingLocal,
        };
        self.push(message.clone());
        message
    }

    /// The transcript in display order.
    ///
    /// Returns an owned snapshot sorted by (timestamp, arrival sequence);
    /// the caller can enumerate it freely while further events apply.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Message> {
        let mut ordered: Vec<&Entry> = self.entries.iter().collect();
        ordered.sort_by_key(|e| (e.message.timestamp, e.seq));
        ordered.into_iter().map(|e| e.message.clone()).collect()
    }

    fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.message.id == id)
    }

    fn push(&mut self, message: Message) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { seq, message });
    }

    fn push_presence(
        &mut self,
        kind: MessageKind,
        username: &str,
        verb: &str,
        at: DateTime<Utc>,
    ) {
        let message = Message {
            id: self.alloc_local_id(),
            kind,
            sender: String::new(),
            content: format!("{username} has {verb} the room"),
            timestamp: at,
            origin: MessageOrigin::Confirmed,
        };
        self.push(message);
    }

    fn alloc_local_id(&mut self) -> String {
        let id = self.next_local_id;
        self.next_local_id += 1;
        format!("local-{id}")
    }
}
