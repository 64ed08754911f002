//! Duel channel lifecycle: open, subscribe, deliver, close.
//!
//! One open channel maps to one mounted duel view. The channel owns its
//! transport connection and a reader task that decodes frames into the
//! typed event stream; `close` tears both down and is safe to call twice.
//! There is no automatic reconnect, reopening after a failure is always an
//! explicit caller action.

use futures::channel::mpsc;
use heroclash_api::config::ClientConfig;
use heroclash_api::credentials::Credentials;
use heroclash_api::errors::ClientError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::events::{DuelEvent, DuelEventStream};
use crate::protocol::{decode_frame, progress_topic, result_topic, subscribe_frame};
use crate::transport::{DuelTransport, WsTransport};

/// Open the duel channel for a session.
///
/// Establishes the WebSocket connection with the bearer credential at
/// handshake, then subscribes to the session's progress and result topics.
/// Blank credentials fail before any connection attempt.
pub async fn open_duel_channel(
    config: &ClientConfig,
    session_id: &str,
    credentials: &Credentials,
) -> Result<DuelChannel, ClientError> {
    if !credentials.is_usable() {
        return Err(ClientError::MissingCredentials);
    }
    let transport = WsTransport::connect(&config.channel_url, credentials).await?;
    DuelChannel::open_with_transport(transport, session_id).await
}

/// Handle to one open duel subscription.
pub struct DuelChannel {
    session_id: String,
    shutdown: watch::Sender<bool>,
    reader: Option<JoinHandle<()>>,
    events: Option<DuelEventStream>,
}

impl std::fmt::Debug for DuelChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuelChannel")
            .field("session_id", &self.session_id)
            .field("open", &self.is_open())
            .finish()
    }
}

impl DuelChannel {
    /// Subscribe and start the reader over an already-connected transport.
    ///
    /// Public so the lifecycle can be exercised against a scripted transport
    /// instead of a live socket.
    pub async fn open_with_transport<T: DuelTransport + 'static>(
        mut transport: T,
        session_id: &str,
    ) -> Result<Self, ClientError> {
        transport
            .send_text(subscribe_frame(&progress_topic(session_id)))
            .await?;
        transport
            .send_text(subscribe_frame(&result_topic(session_id)))
            .await?;
        tracing::debug!(session_id, "duel topics subscribed");

        let (events_tx, events_rx) = mpsc::unbounded();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let reader = tokio::spawn(read_loop(
            transport,
            session_id.to_string(),
            events_tx,
            shutdown_rx,
        ));

        Ok(Self {
            session_id: session_id.to_string(),
            shutdown,
            reader: Some(reader),
            events: Some(Box::pin(events_rx)),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Take the event stream. Yields each decoded push in arrival order and
    /// ends when the channel is closed or the connection drops.
    pub fn take_events(&mut self) -> Option<DuelEventStream> {
        self.events.take()
    }

    /// Graceful disconnect. Calling this when the channel is already closed
    /// does nothing.
    pub async fn close(&mut self) {
        let Some(reader) = self.reader.take() else {
            tracing::debug!(session_id = %self.session_id, "duel channel already closed");
            return;
        };
        let _ = self.shutdown.send(true);
        let _ = reader.await;
        // Anything still buffered belongs to a view that is going away.
        self.events = None;
        tracing::debug!(session_id = %self.session_id, "duel channel closed");
    }
}

impl Drop for DuelChannel {
    fn drop(&mut self) {
        if self.reader.is_some() {
            let _ = self.shutdown.send(true);
        }
    }
}

async fn read_loop<T: DuelTransport>(
    mut transport: T,
    session_id: String,
    events: mpsc::UnboundedSender<Result<DuelEvent, ClientError>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let cancelled = loop {
        tokio::select! {
            changed = shutdown.changed() => {
                // Err means the handle was dropped without close; stop
                // either way.
                let _ = changed;
                break true;
            }
            incoming = transport.next_text() => match incoming {
                Some(Ok(text)) => {
                    if let Some(event) = decode_frame(&session_id, &text) {
                        if events.unbounded_send(event).is_err() {
                            break true;
                        }
                    }
                }
                Some(Err(error)) => {
                    tracing::error!(%error, "duel channel transport failed");
                    let _ = events.unbounded_send(Err(error));
                    break false;
                }
                None => {
                    tracing::debug!(%session_id, "duel channel stream ended");
                    break false;
                }
            }
        }
    };

    if cancelled {
        let _ = transport.close().await;
    }
}
