//! Error types for the client I/O layer.
//!
//! Split by how the caller is expected to react: [`ApiError`] covers
//! request/response calls (history failure degrades, it never kills a
//! session), [`SendError`] covers outbound sends (surfaced to the caller,
//! the optimistic echo stays visible). Stream termination is not an error
//! type at all — it is a [`crate::ConnectionStatus`] transition.

use thiserror::Error;

use crate::stream::ConnectionStatus;

/// Errors from request/response calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP-level failure (connect, timeout, non-success status).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not parse as the expected shape.
    #[error("malformed response: {0}")]
    Format(#[from] serde_json::Error),
}

/// Errors surfaced when sending a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Content was empty or whitespace-only; nothing was sent.
    #[error("message is empty")]
    Empty,

    /// The stream is not open; the message was not transmitted.
    #[error("stream is not open (status: {0:?})")]
    NotConnected(ConnectionStatus),

    /// The frame could not be encoded.
    #[error("failed to encode frame: {0}")]
    Encode(String),

    /// The session event loop has already shut down.
    #[error("session is closed")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_error_messages_name_the_status() {
        let error = SendError::NotConnected(ConnectionStatus::Connecting);
        assert!(error.to_string().contains("Connecting"));
    }
}
