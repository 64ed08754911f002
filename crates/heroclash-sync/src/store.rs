//! Shared lobby state fed by the polling task.
//!
//! One store backs one mounted lobby view. Every write goes through
//! [`SessionStore::apply_fetch`], which drops anything late or stale: an
//! outcome lands only while the store is attached and only if its sequence
//! number is newer than the last one applied. A failed fetch records the
//! error and keeps the last-known-good snapshot.

use std::sync::{Arc, Mutex};

use heroclash_api::errors::ClientError;
use heroclash_api::types::GameSession;

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Option<GameSession>,
    last_error: Option<ClientError>,
    issued_seq: u64,
    applied_seq: u64,
    detached: bool,
}

/// Cloneable handle to one lobby's session state.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the sequence number for a fetch about to be issued. Sequence
    /// numbers follow issue order, so a fetch issued later always outranks
    /// one issued earlier no matter which response arrives first.
    pub fn allocate_seq(&self) -> u64 {
        let mut state = self.inner.lock().unwrap();
        state.issued_seq += 1;
        state.issued_seq
    }

    /// Apply a completed fetch. Returns false when the outcome was dropped
    /// because the store is detached or a newer fetch already landed.
    ///
    /// An error outcome also claims its sequence number, so a slower success
    /// issued before it can never roll the snapshot back afterwards.
    pub fn apply_fetch(&self, seq: u64, outcome: Result<GameSession, ClientError>) -> bool {
        let mut state = self.inner.lock().unwrap();
        if state.detached {
            tracing::debug!(seq, "fetch outcome dropped, store detached");
            return false;
        }
        if seq <= state.applied_seq {
            tracing::debug!(
                seq,
                applied = state.applied_seq,
                "stale fetch outcome dropped"
            );
            return false;
        }
        state.applied_seq = seq;
        match outcome {
            Ok(session) => {
                state.snapshot = Some(session);
                state.last_error = None;
            }
            Err(error) => {
                // Snapshot stays as it was.
                state.last_error = Some(error);
            }
        }
        true
    }

    /// Latest applied snapshot, whole or not at all.
    pub fn snapshot(&self) -> Option<GameSession> {
        self.inner.lock().unwrap().snapshot.clone()
    }

    pub fn last_error(&self) -> Option<ClientError> {
        self.inner.lock().unwrap().last_error.clone()
    }

    pub fn is_attached(&self) -> bool {
        !self.inner.lock().unwrap().detached
    }

    /// Stop accepting fetch outcomes for good. A remounted view starts over
    /// with a fresh store.
    pub fn detach(&self) {
        self.inner.lock().unwrap().detached = true;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use heroclash_api::errors::build_api_error;

    use super::*;

    fn session(id: &str, users: &[&str]) -> GameSession {
        GameSession {
            id: id.to_string(),
            users: Some(users.iter().map(ToString::to_string).collect()),
            heroes: Some(Vec::new()),
            selected_heroes: HashMap::new(),
            duel_started: false,
            ready_players: Vec::new(),
        }
    }

    #[test]
    fn successful_fetch_replaces_snapshot_and_clears_error() {
        let store = SessionStore::new();
        let first = store.allocate_seq();
        store.apply_fetch(first, Err(build_api_error(500, "")));
        assert!(store.last_error().is_some());

        let second = store.allocate_seq();
        assert!(store.apply_fetch(second, Ok(session("g1", &["ada"]))));
        assert_eq!(store.snapshot().map(|s| s.id), Some("g1".to_string()));
        assert_eq!(store.last_error(), None);
    }

    #[test]
    fn failed_fetch_keeps_last_known_good_snapshot() {
        let store = SessionStore::new();
        store.apply_fetch(store.allocate_seq(), Ok(session("g1", &["ada", "bo"])));

        store.apply_fetch(store.allocate_seq(), Err(build_api_error(503, "")));
        let snapshot = store.snapshot().expect("snapshot retained");
        assert_eq!(snapshot.users.as_deref(), Some(&["ada".to_string(), "bo".to_string()][..]));
        assert!(store.last_error().is_some());
    }

    #[test]
    fn reversed_completion_order_keeps_the_newest_snapshot() {
        let store = SessionStore::new();
        let older = store.allocate_seq();
        let newer = store.allocate_seq();

        assert!(store.apply_fetch(newer, Ok(session("g1", &["ada", "bo"]))));
        assert!(!store.apply_fetch(older, Ok(session("g1", &["ada"]))));

        let snapshot = store.snapshot().expect("snapshot");
        assert_eq!(snapshot.users.map(|u| u.len()), Some(2));
    }

    #[test]
    fn error_outcome_blocks_an_older_success() {
        let store = SessionStore::new();
        let older = store.allocate_seq();
        let newer = store.allocate_seq();

        store.apply_fetch(newer, Err(build_api_error(500, "")));
        assert!(!store.apply_fetch(older, Ok(session("g1", &["ada"]))));

        assert_eq!(store.snapshot(), None);
        assert!(store.last_error().is_some());
    }

    #[test]
    fn detached_store_drops_every_outcome() {
        let store = SessionStore::new();
        store.apply_fetch(store.allocate_seq(), Ok(session("g1", &["ada"])));
        store.detach();
        assert!(!store.is_attached());

        let late = store.allocate_seq();
        assert!(!store.apply_fetch(late, Ok(session("g2", &["bo"]))));
        assert_eq!(store.snapshot().map(|s| s.id), Some("g1".to_string()));
    }
}
