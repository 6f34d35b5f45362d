//! Core state for the Parlor chat client.
//!
//! Pure data and state machines with no I/O: the message model and the
//! per-room [`Transcript`] that merges historical and live events into one
//! ordered, deduplicated log. Callers pass timestamps in and identifiers
//! for locally-created entries come from an internal counter, so everything
//! here is deterministic and testable without a runtime.

mod message;
mod transcript;

pub use message::{Message, MessageKind, MessageOrigin};
pub use transcript::{MergeOutcome, Transcript};
