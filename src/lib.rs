//! Memory Match - an emoji pair-matching card game
//!
//! Core modules:
//! - `deck`: Symbol catalog and shuffled deck generation
//! - `sim`: Reveal/match state machine (no clock, no platform code)
//! - `runtime`: Virtual-clock timer host that drives the engine
//! - `highscores`: Best time and moves per difficulty
//! - `settings`: Persisted player preferences
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser bindings

pub mod deck;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod runtime;
pub mod settings;
pub mod shuffle;
pub mod sim;

pub use deck::{Card, CardStatus, Deck, SYMBOL_CATALOG, generate_deck};
pub use error::{GameError, Result, StorageError};
pub use highscores::{HighScoreRecord, ScoreStore};
pub use persistence::{KeyValueStore, MemoryStore};
pub use runtime::GameRuntime;
pub use settings::{Difficulty, Settings, Theme};
pub use sim::{GameEngine, Snapshot};

/// Game timing constants (milliseconds)
pub mod consts {
    /// How long a matching pair stays face up before it is marked matched
    pub const MATCH_DELAY_MS: u32 = 300;
    /// How long a mismatched pair stays face up before flipping back
    pub const MISMATCH_DELAY_MS: u32 = 800;
    /// Elapsed-time granularity
    pub const TICK_INTERVAL_MS: u32 = 1000;
}

/// Format seconds as `mm:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
