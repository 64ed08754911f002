//! Recurring session fetch bound to a lobby view's lifetime.
//!
//! `start_polling` spawns a task that reads the session snapshot on a fixed
//! interval and routes every outcome through the store's sequence guard.
//! Stopping the handle cancels the loop and detaches the store; a fetch
//! still in flight at that moment is abandoned and its result never reaches
//! the store.

use std::time::Duration;

use heroclash_api::client::ApiClient;
use heroclash_api::credentials::Credentials;
use heroclash_api::errors::ClientError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::SessionStore;

/// Lower bound on the poll interval. Anything tighter hammers the backend
/// without making the lobby feel more live.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cancellation handle for one polling loop.
pub struct PollHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Cancel the loop and wait for the task to wind down. The store is
    /// detached on the way out, so nothing can land in it afterwards.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.shutdown.send(true);
        }
    }
}

/// Start polling the session snapshot into `store`.
///
/// The first read happens immediately, then one per interval. Failed reads
/// set the store's error and the loop keeps going; a blank credential skips
/// the network entirely and records the authorization error instead.
pub fn start_polling(
    client: ApiClient,
    credentials: Credentials,
    session_id: impl Into<String>,
    interval: Duration,
    store: SessionStore,
) -> PollHandle {
    let session_id = session_id.into();
    let interval = if interval < MIN_POLL_INTERVAL {
        tracing::warn!(
            requested_ms = interval.as_millis() as u64,
            minimum_ms = MIN_POLL_INTERVAL.as_millis() as u64,
            "poll interval below minimum, clamped"
        );
        MIN_POLL_INTERVAL
    } else {
        interval
    };

    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(
            %session_id,
            interval_ms = interval.as_millis() as u64,
            "session polling started"
        );
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {}
            }
            // Checked every tick so a blank token never reaches the network.
            if !credentials.is_usable() {
                store.apply_fetch(store.allocate_seq(), Err(ClientError::MissingCredentials));
                continue;
            }
            let seq = store.allocate_seq();
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                outcome = client.fetch_session(&credentials, &session_id) => {
                    if let Err(error) = &outcome {
                        tracing::debug!(seq, %error, "session fetch failed");
                    }
                    store.apply_fetch(seq, outcome);
                }
            }
        }
        store.detach();
        tracing::debug!(%session_id, "session polling stopped");
    });

    PollHandle {
        shutdown,
        task: Some(task),
    }
}
