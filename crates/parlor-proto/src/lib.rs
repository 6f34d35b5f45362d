//! Wire types for the Parlor chat protocol.
//!
//! The server speaks JSON on both channels: request/response calls return
//! plain JSON bodies, and the per-room event stream carries one JSON object
//! per text frame, tagged by an `event` field. Payloads are small and
//! self-describing, so everything here is plain serde with no custom
//! framing.
//!
//! # Invariants
//!
//! - Decoding never panics: malformed input surfaces as [`WireError`].
//! - Encoding a [`ClientFrame`] and decoding it as a [`ServerEvent`] is NOT
//!   expected to round-trip; the two directions carry different shapes.

mod event;
mod rest;

pub use event::{ClientFrame, ServerEvent, WireError};
pub use rest::{HistoryMessage, RoomInfo, UserInfo};
