//! Wire types for the game backend (heroes, sessions, accounts, duels).
//!
//! Everything here is a read-only snapshot decoded from backend JSON. The
//! backend owns all game state; the client never patches these, it replaces
//! them wholesale with the next snapshot it receives.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A hero stat card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    /// Roster identifier. Combat snapshots pushed over the duel channel may
    /// omit it, so it stays optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub hp: i32,
    pub mana: i32,
    pub attack: i32,
    pub defense: i32,
    pub attack_damage: i32,
    pub attack_speed: f64,
    pub main_element: String,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A matchmaking session snapshot.
///
/// `users` and `heroes` stay optional because the backend can answer with a
/// session that has neither populated yet; the lobby renderer turns that
/// absence into its session-problem notice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heroes: Option<Vec<Hero>>,
    /// Username to chosen hero id. An absent entry means that participant
    /// has not picked yet.
    #[serde(default)]
    pub selected_heroes: HashMap<String, u64>,
    #[serde(default)]
    pub duel_started: bool,
    #[serde(default)]
    pub ready_players: Vec<String>,
}

impl GameSession {
    /// True iff the selection map's key set equals the participant set
    /// exactly. An entry for a non-participant counts against readiness just
    /// like a missing one, so a stale selection can never unlock the duel.
    pub fn all_players_ready(&self) -> bool {
        let Some(users) = &self.users else {
            return false;
        };
        if self.selected_heroes.len() != users.len() {
            return false;
        }
        users.iter().all(|u| self.selected_heroes.contains_key(u))
    }

    /// Missing `users` or `heroes` means the snapshot is unusable for the
    /// lobby.
    pub fn is_renderable(&self) -> bool {
        self.users.is_some() && self.heroes.is_some()
    }
}

/// Discovery listing entry for the find-game page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub players: Vec<String>,
}

/// One combat-state frame pushed over the duel channel.
///
/// Both heroes are mandatory; a frame missing either is rejected before it
/// can reach the view model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuelUpdate {
    pub hero1: Hero,
    pub hero2: Hero,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameUpdate {
    pub username: String,
}
