//! Typed events delivered by the duel channel.

use std::pin::Pin;

use futures::Stream;
use heroclash_api::errors::ClientError;
use heroclash_api::types::DuelUpdate;

/// One decoded server push.
#[derive(Clone, Debug, PartialEq)]
pub enum DuelEvent {
    /// A combat-state frame from `duel-progress/{gameId}`.
    Progress(DuelUpdate),
    /// The terminal outcome string from `duel-result/{gameId}`. After this
    /// the duel is concluded; further progress frames may still arrive but
    /// never un-conclude it.
    Result(String),
}

/// Push-delivered event sequence for one open channel.
///
/// Items arrive in transport order. A validation failure on a single frame
/// is an `Err` item and the stream keeps going; a transport failure is the
/// final `Err` before the stream ends.
pub type DuelEventStream = Pin<Box<dyn Stream<Item = Result<DuelEvent, ClientError>> + Send>>;
