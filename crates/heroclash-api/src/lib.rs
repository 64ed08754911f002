//! REST client, wire types, and credential handling for the card-duel
//! backend.
//!
//! The backend owns all game logic; this crate only issues commands and
//! decodes snapshots. Live push delivery lives in `heroclash-channel`, and
//! the view-state synchronization core in `heroclash-sync`.

pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod types;

#[allow(unused_imports)]
pub use client::*;
#[allow(unused_imports)]
pub use config::*;
#[allow(unused_imports)]
pub use credentials::*;
#[allow(unused_imports)]
pub use errors::*;
#[allow(unused_imports)]
pub use types::*;
