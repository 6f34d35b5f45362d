//! I/O layer and session orchestration for the Parlor chat client.
//!
//! Three pieces, matching the two transports and the thing that ties them
//! together:
//!
//! - [`ApiClient`]: request/response calls — room history, room directory,
//!   username registration.
//! - [`StreamConnection`]: one WebSocket connection per room session, with
//!   an observable [`ConnectionStatus`].
//! - [`RoomSession`]: the per-room controller. It starts the history fetch
//!   and the stream together, funnels both into a single
//!   [`parlor_core::Transcript`] writer, and exposes display-ordered
//!   snapshots and connection status over watch channels.
//!
//! Nothing here retries on its own: failed history degrades to an empty
//! seed, a dead stream is surfaced as a terminal status, and the caller
//! decides whether to open a fresh session.

mod api;
mod config;
mod error;
mod session;
mod stream;

pub use api::ApiClient;
pub use config::ServerConfig;
pub use error::{ApiError, SendError};
pub use session::{RoomSession, TranscriptSnapshot};
pub use stream::{ConnectionStatus, StreamConnection};
