//! Game simulation
//!
//! All gameplay logic lives here. It has no clock and no platform
//! dependencies:
//! - Inputs arrive as [`GameEvent`]s
//! - Delays come back out as [`Effect`]s for the host to schedule
//! - Deferred actions carry their session generation so stale ones are
//!   dropped

pub mod engine;
pub mod event;
pub mod snapshot;
pub mod state;

pub use engine::GameEngine;
pub use event::{Deferred, Effect, GameEvent, SoundCue};
pub use snapshot::{Snapshot, WinSummary};
pub use state::{GameSession, PendingResolution, RevealBuffer, SessionPhase};
