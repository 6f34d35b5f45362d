//! Per-room session orchestration.
//!
//! A [`RoomSession`] lives exactly as long as one room view. Opening it
//! starts the history fetch and the stream connection together; neither
//! blocks the caller. Both feeds, plus outbound sends, converge on a
//! single event-loop task that owns the [`Transcript`] — the one writer —
//! and publishes display-ordered snapshots over a watch channel.
//!
//! Lifecycle: the loop starts in its initializing phase (history pending,
//! stream connecting), is ready once the stream reports
//! [`ConnectionStatus::Open`], and winds down when [`RoomSession::close`]
//! is called or the handle is dropped. On every exit path the stream is
//! closed exactly once, and anything arriving afterwards — a late history
//! response, a straggling event — finds the loop gone and is dropped.

use std::sync::Arc;

use chrono::Utc;
use parlor_core::{Message, Transcript};
use parlor_proto::ServerEvent;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::{
    api::ApiClient,
    error::{ApiError, SendError},
    stream::{ConnectionStatus, StreamConnection},
};

/// An ordered, immutable transcript snapshot.
pub type TranscriptSnapshot = Arc<Vec<Message>>;

enum Command {
    Send { content: String, reply: oneshot::Sender<Result<(), SendError>> },
    Close,
}

/// Handle to one live room session.
///
/// Cheap to query: transcript snapshots and connection status are
/// published over watch channels, so the presentation layer can either
/// poll the latest value or await changes. Dropping the handle closes the
/// session.
#[derive(Debug)]
pub struct RoomSession {
    room_id: String,
    username: String,
    transcript_rx: watch::Receiver<TranscriptSnapshot>,
    status_rx: watch::Receiver<ConnectionStatus>,
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl RoomSession {
    /// Open a session: start the history fetch and the stream connection
    /// concurrently and return immediately.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn open(api: ApiClient, room_id: impl Into<String>, username: impl Into<String>) -> Self {
        let room_id = room_id.into();
        let username = username.into();

        let (stream, events) = StreamConnection::open(api.config(), &room_id, &username);
        let status_rx = stream.status_watch();
        let (transcript_tx, transcript_rx) = watch::channel(TranscriptSnapshot::default());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (history_tx, history_rx) = oneshot::channel();

        {
            let api = api.clone();
            let room_id = room_id.clone();
            tokio::spawn(async move {
                // The loop may be gone by the time history resolves; that
                // drops the result on the floor, by contract.
                let _ = history_tx.send(api.room_history(&room_id).await);
            });
        }

        tokio::spawn(run_session(
            username.clone(),
            stream,
            events,
            history_rx,
            cmd_rx,
            transcript_tx,
        ));

        Self { room_id, username, transcript_rx, status_rx, cmd_tx }
    }

    /// Room this session is bound to.
    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Username this session is bound to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Latest transcript snapshot, in display order.
    #[must_use]
    pub fn current_transcript(&self) -> TranscriptSnapshot {
        self.transcript_rx.borrow().clone()
    }

    /// Watch channel carrying every transcript update.
    #[must_use]
    pub fn transcript_watch(&self) -> watch::Receiver<TranscriptSnapshot> {
        self.transcript_rx.clone()
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Watch channel carrying every connection status transition.
    ///
    /// Terminal statuses are surfaced, never acted on: reconnecting is the
    /// caller's decision, made by opening a new session.
    #[must_use]
    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Send a chat message.
    ///
    /// Empty or whitespace-only content is rejected locally without a
    /// network round-trip. Otherwise the message appears in the transcript
    /// immediately as a pending echo, then goes out on the stream; if the
    /// stream send fails the echo stays visible and the error is returned.
    pub async fn send_message(&self, content: &str) -> Result<(), SendError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SendError::Empty);
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Send { content: content.to_owned(), reply: reply_tx })
            .map_err(|_| SendError::SessionClosed)?;
        reply_rx.await.map_err(|_| SendError::SessionClosed)?
    }

    /// End the session and release the connection. Idempotent; also runs
    /// on drop.
    pub fn close(&self) {
        let _ = self.cmd_tx.send(Command::Close);
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// The single-writer event loop: every transcript mutation happens here.
async fn run_session(
    username: String,
    stream: StreamConnection,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
    mut history_rx: oneshot::Receiver<Result<Vec<Message>, ApiError>>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    transcript_tx: watch::Sender<TranscriptSnapshot>,
) {
    let mut transcript = Transcript::new();
    let mut history_pending = true;
    let mut events_open = true;

    loop {
        tokio::select! {
            command = cmd_rx.recv() => match command {
                Some(Command::Send { content, reply }) => {
                    transcript.apply_outbound(&username, &content, Utc::now());
                    publish(&transcript_tx, &transcript);

                    // The echo stays visible either way; a failure is the
                    // caller's to surface.
                    let _ = reply.send(stream.send(&content));
                },
                Some(Command::Close) | None => break,
            },
            event = events.recv(), if events_open => match event {
                Some(event) => {
                    transcript.apply_inbound(event, Utc::now());
                    publish(&transcript_tx, &transcript);
                },
                // Stream task gone; its terminal status is already on the
                // watch. The session stays up for reads until closed.
                None => events_open = false,
            },
            result = &mut history_rx, if history_pending => {
                history_pending = false;
                match result {
                    Ok(Ok(history)) => {
                        let seeded = transcript.seed(history);
                        debug!(seeded, "history merged");
                        publish(&transcript_tx, &transcript);
                    },
                    Ok(Err(error)) => {
                        warn!(%error, "history fetch failed; continuing with live events only");
                    },
                    Err(_) => {},
                }
            },
        }
    }

    stream.close();
}

fn publish(transcript_tx: &watch::Sender<TranscriptSnapshot>, transcript: &Transcript) {
    let _ = transcript_tx.send(Arc::new(transcript.snapshot()));
}
