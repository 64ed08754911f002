//! Real-time duel channel for HeroClash clients.
//!
//! Wraps one authenticated WebSocket connection per mounted duel view,
//! subscribes to that session's progress and result topics, and exposes the
//! pushes as a typed event stream. Connection failures end the stream; the
//! caller decides whether to reopen.

pub mod client;
pub mod events;
pub mod protocol;
pub mod transport;

#[allow(unused_imports)]
pub use client::*;
#[allow(unused_imports)]
pub use events::*;
#[allow(unused_imports)]
pub use protocol::*;
#[allow(unused_imports)]
pub use transport::*;
