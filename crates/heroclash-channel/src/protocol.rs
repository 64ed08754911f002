//! Wire protocol for the duel channel.
//!
//! The backend speaks a small envelope scheme over one WebSocket: the client
//! sends `{"action":"subscribe","topic":...}` once per topic, the server
//! pushes `{"topic":...,"body":...}` where `body` is the topic's payload
//! (JSON for progress frames, plain text for results).

use heroclash_api::errors::{ClientError, ValidationError};
use heroclash_api::types::DuelUpdate;
use serde::{Deserialize, Serialize};

use crate::events::DuelEvent;

pub fn progress_topic(session_id: &str) -> String {
    format!("duel-progress/{session_id}")
}

pub fn result_topic(session_id: &str) -> String {
    format!("duel-result/{session_id}")
}

#[derive(Debug, Serialize)]
struct SubscribeFrame<'a> {
    action: &'static str,
    topic: &'a str,
}

/// Client frame subscribing to one topic.
pub fn subscribe_frame(topic: &str) -> String {
    // Serializing a two-field struct cannot fail.
    serde_json::to_string(&SubscribeFrame {
        action: "subscribe",
        topic,
    })
    .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct Envelope {
    topic: String,
    body: String,
}

/// Decode one incoming text frame for the given session.
///
/// Returns `None` for frames that are not ours: non-envelope text (server
/// heartbeats and the like) and envelopes for other sessions' topics.
pub fn decode_frame(session_id: &str, text: &str) -> Option<Result<DuelEvent, ClientError>> {
    let envelope = match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => envelope,
        Err(_) => {
            tracing::debug!("ignoring non-envelope frame");
            return None;
        }
    };

    if envelope.topic == progress_topic(session_id) {
        Some(decode_progress(&envelope.body))
    } else if envelope.topic == result_topic(session_id) {
        Some(Ok(DuelEvent::Result(envelope.body)))
    } else {
        tracing::debug!(topic = %envelope.topic, "ignoring frame for other topic");
        None
    }
}

/// A progress body must parse as JSON and carry both combatants; the two
/// failure shapes keep their own messages.
fn decode_progress(body: &str) -> Result<DuelEvent, ClientError> {
    let value = serde_json::from_str::<serde_json::Value>(body).map_err(|_| {
        ClientError::Validation(ValidationError::new("Failed to parse duel update"))
    })?;
    let update = serde_json::from_value::<DuelUpdate>(value).map_err(|_| {
        ClientError::Validation(ValidationError::new("Invalid duel update data received"))
    })?;
    Ok(DuelEvent::Progress(update))
}
