//! Engine inputs and outputs
//!
//! The engine never owns a clock. Anything that must happen later is
//! returned as an [`Effect`] for the host to schedule, and comes back in as
//! [`GameEvent::Fire`].

use serde::Serialize;

use super::snapshot::WinSummary;
use crate::settings::Difficulty;

/// Deferred work, tagged with the session generation it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Deferred {
    /// Resolve the pending pair as match or mismatch
    Resolve { generation: u64 },
    /// One second of elapsed play
    Tick { generation: u64 },
}

impl Deferred {
    pub fn generation(&self) -> u64 {
        match self {
            Deferred::Resolve { generation } | Deferred::Tick { generation } => *generation,
        }
    }
}

/// One-way audio hints for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Flip,
    Match,
    Win,
}

/// Input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player clicked a card
    Reveal(usize),
    /// Start over on the given difficulty
    Restart(Difficulty),
    /// Change difficulty (persists the choice, then restarts)
    SetDifficulty(Difficulty),
    /// A previously scheduled action came due
    Fire(Deferred),
}

/// Instructions for the host produced by handling an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    /// Fire `action` once after `delay_ms`
    Schedule { action: Deferred, delay_ms: u32 },
    /// Fire `action` every `interval_ms` until stopped or cancelled
    ScheduleRepeating { action: Deferred, interval_ms: u32 },
    /// Drop every pending action scheduled for `generation`
    CancelGeneration { generation: u64 },
    /// Drop the repeating tick of `generation`
    StopTicker { generation: u64 },
    Sound(SoundCue),
    /// The session was just won
    Won(WinSummary),
}
