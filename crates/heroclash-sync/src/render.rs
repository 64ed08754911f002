//! Pure mapping from held state to what a page presents.
//!
//! No network, no timers, no clocks. Callers pass in store or view-model
//! state and get back a plain description of the page; what a view does
//! with it is its own business.

use heroclash_api::errors::ClientError;
use heroclash_api::types::{GameSession, Hero};

use crate::duel_view::DuelViewModel;

/// Shown whenever the lobby has no usable snapshot, regardless of whether a
/// fetch is underway.
pub const SESSION_PROBLEM_MESSAGE: &str =
    "There is a problem with the game session. Reload the page or find a new game session.";

/// Duel-stage placeholder until the first full combat frame arrives.
pub const LOADING_HEROES_MESSAGE: &str = "Loading Heroes...";

/// One lobby roster row.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRow {
    pub username: String,
    /// Name of the hero this player picked, once they have.
    pub selected_hero: Option<String>,
}

/// Everything the lobby page presents.
#[derive(Clone, Debug, PartialEq)]
pub struct LobbyView {
    /// Set when there is no usable snapshot; rendered instead of the roster.
    pub notice: Option<String>,
    pub session_id: Option<String>,
    pub players: Vec<PlayerRow>,
    pub hero_roster: Vec<Hero>,
    /// Gates the enter-duel control and nothing else.
    pub can_enter_duel: bool,
    /// Rendered alongside the rest, never instead of it.
    pub error: Option<String>,
}

/// Map the polled lobby state to its presentation.
pub fn render_lobby(
    snapshot: Option<&GameSession>,
    last_error: Option<&ClientError>,
) -> LobbyView {
    let error = last_error.map(|e| e.message().to_string());
    let Some(session) = snapshot else {
        return problem_lobby(None, error);
    };
    let (Some(users), Some(heroes)) = (&session.users, &session.heroes) else {
        return problem_lobby(Some(session.id.clone()), error);
    };

    let players = users
        .iter()
        .map(|username| PlayerRow {
            username: username.clone(),
            selected_hero: session
                .selected_heroes
                .get(username)
                .map(|hero_id| hero_name(heroes, *hero_id)),
        })
        .collect();

    LobbyView {
        notice: None,
        session_id: Some(session.id.clone()),
        players,
        hero_roster: heroes.clone(),
        can_enter_duel: session.all_players_ready(),
        error,
    }
}

fn problem_lobby(session_id: Option<String>, error: Option<String>) -> LobbyView {
    LobbyView {
        notice: Some(SESSION_PROBLEM_MESSAGE.to_string()),
        session_id,
        players: Vec::new(),
        hero_roster: Vec::new(),
        can_enter_duel: false,
        error,
    }
}

fn hero_name(heroes: &[Hero], hero_id: u64) -> String {
    heroes
        .iter()
        .find(|hero| hero.id == Some(hero_id))
        .map(|hero| hero.name.clone())
        .unwrap_or_else(|| format!("#{hero_id}"))
}

/// Start-duel control state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartControl {
    /// Gone for good once the result came in.
    Hidden,
    /// Visible but inert while a start request is in flight.
    Disabled,
    Enabled,
}

/// Everything the duel page presents.
#[derive(Clone, Debug, PartialEq)]
pub struct DuelStageView {
    /// True until both combatant snapshots have been seen at least once.
    pub loading: bool,
    pub hero1: Option<Hero>,
    pub hero2: Option<Hero>,
    pub result: Option<String>,
    pub error: Option<String>,
    pub start_control: StartControl,
}

/// Map the duel view model to its presentation.
pub fn render_duel_stage(model: &DuelViewModel) -> DuelStageView {
    let start_control = if model.result.is_some() {
        StartControl::Hidden
    } else if model.start_in_flight {
        StartControl::Disabled
    } else {
        StartControl::Enabled
    };

    DuelStageView {
        loading: model.hero1.is_none() || model.hero2.is_none(),
        hero1: model.hero1.clone(),
        hero2: model.hero2.clone(),
        result: model.result.clone(),
        error: model.last_error.clone(),
        start_control,
    }
}
