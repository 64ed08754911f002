//! View-model state for the duel stage.
//!
//! Holds what the duel page shows: both combatant snapshots, the terminal
//! result, the single error slot, and whether a start request is in flight.
//! [`drive_duel_view`] pumps a channel event stream into a shared model
//! until the stream ends or the model detaches.

use std::sync::{Arc, Mutex};

use futures::StreamExt;
use heroclash_api::errors::ClientError;
use heroclash_api::types::Hero;
use heroclash_channel::events::{DuelEvent, DuelEventStream};
use tokio::task::JoinHandle;

/// Mutable state behind one mounted duel view.
#[derive(Clone, Debug)]
pub struct DuelViewModel {
    pub hero1: Option<Hero>,
    pub hero2: Option<Hero>,
    /// Terminal outcome text. Once set the duel stays concluded; later
    /// progress frames update the combatants but never un-conclude it.
    pub result: Option<String>,
    /// Most recent error message. One slot, latest wins.
    pub last_error: Option<String>,
    pub start_in_flight: bool,
    attached: bool,
}

impl Default for DuelViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DuelViewModel {
    pub fn new() -> Self {
        Self {
            hero1: None,
            hero2: None,
            result: None,
            last_error: None,
            start_in_flight: false,
            attached: true,
        }
    }

    /// Apply one channel event. A validation error fills the error slot and
    /// leaves the combat state from the last good frame untouched. Detached
    /// models ignore everything.
    pub fn apply_event(&mut self, event: Result<DuelEvent, ClientError>) {
        if !self.attached {
            tracing::debug!("duel event dropped, view detached");
            return;
        }
        match event {
            Ok(DuelEvent::Progress(update)) => {
                self.hero1 = Some(update.hero1);
                self.hero2 = Some(update.hero2);
            }
            Ok(DuelEvent::Result(outcome)) => {
                self.result = Some(outcome);
            }
            Err(error) => {
                self.last_error = Some(error.message().to_string());
            }
        }
    }

    pub fn is_duel_over(&self) -> bool {
        self.result.is_some()
    }

    /// Mark a start request as issued. Refused once the duel has concluded
    /// or while another start is already in flight; a detached model refuses
    /// too.
    pub fn begin_start(&mut self) -> bool {
        if !self.attached || self.result.is_some() || self.start_in_flight {
            return false;
        }
        self.start_in_flight = true;
        true
    }

    /// Record the outcome of the start request issued via [`begin_start`].
    /// An outcome settling after detach is dropped.
    pub fn finish_start(&mut self, outcome: Result<(), ClientError>) {
        if !self.attached {
            tracing::debug!("start outcome dropped, view detached");
            return;
        }
        self.start_in_flight = false;
        if let Err(error) = outcome {
            self.last_error = Some(error.message().to_string());
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Stop accepting updates of any kind. The view is going away; whatever
    /// is on screen stays frozen.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

/// Pump channel events into a shared view model.
///
/// Runs until the stream ends or the model detaches. Pair it with closing
/// the channel on unmount; either one alone already stops further updates.
pub fn drive_duel_view(
    mut events: DuelEventStream,
    model: Arc<Mutex<DuelViewModel>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let mut model = model.lock().unwrap();
            if !model.is_attached() {
                break;
            }
            model.apply_event(event);
        }
        tracing::debug!("duel event pump finished");
    })
}
