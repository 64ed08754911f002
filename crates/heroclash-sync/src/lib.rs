//! Client-side state synchronization for HeroClash views.
//!
//! Ties the REST client and the duel channel to view-facing state: a polled
//! session store behind the lobby, a push-fed view model behind the duel
//! stage, and the pure render mappings both pages draw from. Every store or
//! view model belongs to exactly one mounted view and stops accepting
//! writes the moment that view goes away.

pub mod duel_view;
pub mod poller;
pub mod render;
pub mod store;

#[allow(unused_imports)]
pub use duel_view::*;
#[allow(unused_imports)]
pub use poller::*;
#[allow(unused_imports)]
pub use render::*;
#[allow(unused_imports)]
pub use store::*;
