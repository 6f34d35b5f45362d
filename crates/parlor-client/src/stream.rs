//! Room event stream over WebSocket.
//!
//! One [`StreamConnection`] owns exactly one connection for one room
//! session. The connection task is spawned by [`StreamConnection::open`]
//! and drives both directions; the handle only touches channels, so `send`
//! and `close` never block on I/O.
//!
//! # State machine
//!
//! ```text
//! ┌──────┐ open() ┌────────────┐ handshake ok ┌──────┐
//! │ Idle │───────>│ Connecting │─────────────>│ Open │
//! └──────┘        └────────────┘              └──────┘
//!                       │                        │
//!                       │ handshake failure      │ close() / peer close
//!                       │                        │ transport failure
//!                       ↓                        ↓
//!                  ┌─────────┐            ┌───────────────┐
//!                  │ Errored │            │ Closed/Errored│
//!                  └─────────┘            └───────────────┘
//! ```
//!
//! `Closed` and `Errored` are terminal for this connection instance.
//! Reconnecting is a new `open()` call made by the owner; it never happens
//! here.

use futures::{SinkExt, StreamExt};
use parlor_proto::{ClientFrame, ServerEvent};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, warn};

use crate::{config::ServerConfig, error::SendError};

/// Lifecycle of one stream connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not yet started.
    Idle,
    /// Handshake in progress.
    Connecting,
    /// Live; events flow and sends are accepted.
    Open,
    /// Terminated cleanly, locally or by the peer. Terminal.
    Closed,
    /// Terminated by a handshake or transport failure. Terminal.
    Errored,
}

impl ConnectionStatus {
    /// True for `Closed`/`Errored`; a terminal connection never transitions
    /// again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

/// Handle to one room stream connection.
///
/// Dropping the handle tears the connection down as if [`close`] had been
/// called.
///
/// [`close`]: StreamConnection::close
#[derive(Debug)]
pub struct StreamConnection {
    status_tx: watch::Sender<ConnectionStatus>,
    status_rx: watch::Receiver<ConnectionStatus>,
    outbound_tx: mpsc::UnboundedSender<String>,
    abort: tokio::task::AbortHandle,
}

impl StreamConnection {
    /// Open a connection for a room and user.
    ///
    /// Non-blocking: spawns the connection task and returns immediately
    /// with the handle and the inbound event receiver. Events arrive in
    /// exact server send order. Must be called within a tokio runtime.
    #[must_use]
    pub fn open(
        config: &ServerConfig,
        room_id: &str,
        username: &str,
    ) -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let url = config.stream_url(room_id, username);
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Idle);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        transition(&status_tx, ConnectionStatus::Connecting);
        let task = tokio::spawn(run_connection(url, status_tx.clone(), events_tx, outbound_rx));

        let connection =
            Self { status_tx, status_rx, outbound_tx, abort: task.abort_handle() };
        (connection, events_rx)
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Watch channel carrying every status transition.
    #[must_use]
    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Send a chat message to the room.
    ///
    /// Fails synchronously with [`SendError::NotConnected`] unless the
    /// status is [`ConnectionStatus::Open`]. Not retried here.
    pub fn send(&self, content: &str) -> Result<(), SendError> {
        let status = self.status();
        if status != ConnectionStatus::Open {
            return Err(SendError::NotConnected(status));
        }

        let frame = ClientFrame::Message { content: content.to_owned() }
            .encode()
            .map_err(|e| SendError::Encode(e.to_string()))?;

        self.outbound_tx
            .send(frame)
            .map_err(|_| SendError::NotConnected(self.status()))
    }

    /// Terminate the connection. Idempotent; no events are delivered after
    /// this returns.
    pub fn close(&self) {
        transition(&self.status_tx, ConnectionStatus::Closed);
        self.abort.abort();
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Move the status forward unless it is already terminal.
fn transition(status_tx: &watch::Sender<ConnectionStatus>, to: ConnectionStatus) {
    status_tx.send_if_modified(|status| {
        if status.is_terminal() || *status == to {
            return false;
        }
        *status = to;
        true
    });
}

async fn run_connection(
    url: String,
    status_tx: watch::Sender<ConnectionStatus>,
    events_tx: mpsc::UnboundedSender<ServerEvent>,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
) {
    let ws = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(error) => {
            warn!(%url, %error, "stream handshake failed");
            transition(&status_tx, ConnectionStatus::Errored);
            return;
        },
    };

    debug!(%url, "stream open");
    transition(&status_tx, ConnectionStatus::Open);
    let (mut sink, mut source) = ws.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => match outbound {
                Some(text) => {
                    if let Err(error) = sink.send(WsMessage::Text(text)).await {
                        warn!(%error, "stream send failed");
                        transition(&status_tx, ConnectionStatus::Errored);
                        break;
                    }
                },
                // Handle dropped without close(); treat like a local close.
                None => {
                    transition(&status_tx, ConnectionStatus::Closed);
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                },
            },
            inbound = source.next() => match inbound {
                Some(Ok(WsMessage::Text(text))) => match ServerEvent::decode(&text) {
                    Ok(event) => {
                        if events_tx.send(event).is_err() {
                            // Receiver gone; nobody is listening anymore.
                            transition(&status_tx, ConnectionStatus::Closed);
                            break;
                        }
                    },
                    Err(error) => warn!(%error, "dropping undecodable frame"),
                },
                Some(Ok(WsMessage::Close(_))) | None => {
                    debug!(%url, "stream closed by peer");
                    transition(&status_tx, ConnectionStatus::Closed);
                    break;
                },
                // Pings are answered by the protocol layer; binary frames
                // are not part of this protocol.
                Some(Ok(_)) => {},
                Some(Err(error)) => {
                    warn!(%error, "stream transport failure");
                    transition(&status_tx, ConnectionStatus::Errored);
                    break;
                },
            },
        }
    }
}
