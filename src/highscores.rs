//! Best-result tracking per difficulty
//!
//! Two independent metrics are kept for each difficulty: fastest winning
//! time and fewest moves. Both only ever improve.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::KeyValueStore;
use crate::settings::Difficulty;

/// Best results for one difficulty. `None` means never recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreRecord {
    pub best_time_seconds: Option<u32>,
    pub best_moves_count: Option<u32>,
}

impl HighScoreRecord {
    /// Whether `seconds` would beat the stored time. Zero-second results are
    /// treated as unmeasured and never qualify.
    pub fn is_new_best_time(&self, seconds: u32) -> bool {
        if seconds == 0 {
            return false;
        }
        self.best_time_seconds.is_none_or(|best| seconds < best)
    }

    /// Whether `moves` would beat the stored move count
    pub fn is_new_best_moves(&self, moves: u32) -> bool {
        self.best_moves_count.is_none_or(|best| moves < best)
    }

    /// Whether anything has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.best_time_seconds.is_none() && self.best_moves_count.is_none()
    }

    /// Fold a winning result into the record, keeping the better value of
    /// each metric
    pub fn merged_with(&self, seconds: u32, moves: u32) -> Self {
        Self {
            best_time_seconds: if self.is_new_best_time(seconds) {
                Some(seconds)
            } else {
                self.best_time_seconds
            },
            best_moves_count: if self.is_new_best_moves(moves) {
                Some(moves)
            } else {
                self.best_moves_count
            },
        }
    }
}

/// Which metrics a win improved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreUpdate {
    pub new_best_time: bool,
    pub new_best_moves: bool,
}

impl HighScoreUpdate {
    pub fn any(&self) -> bool {
        self.new_best_time || self.new_best_moves
    }
}

/// Reads and writes [`HighScoreRecord`]s through a [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct ScoreStore<S> {
    store: S,
}

impl<S: KeyValueStore> ScoreStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn time_key(difficulty: Difficulty) -> String {
        format!("bestTime_{}", difficulty.as_str())
    }

    pub fn moves_key(difficulty: Difficulty) -> String {
        format!("bestMoves_{}", difficulty.as_str())
    }

    /// Load the record for `difficulty`. Never fails: missing, unparsable or
    /// unreadable values load as absent.
    pub fn load(&self, difficulty: Difficulty) -> HighScoreRecord {
        let record = HighScoreRecord {
            best_time_seconds: self.read_metric(&Self::time_key(difficulty)),
            best_moves_count: self.read_metric(&Self::moves_key(difficulty)),
        };
        log::debug!("Loaded high scores for {}: {:?}", difficulty.as_str(), record);
        record
    }

    /// Overwrite the stored record for `difficulty`. Absent metrics are left
    /// untouched in storage.
    pub fn save(
        &mut self,
        difficulty: Difficulty,
        record: &HighScoreRecord,
    ) -> Result<(), StorageError> {
        if let Some(seconds) = record.best_time_seconds {
            self.store.set(&Self::time_key(difficulty), &seconds.to_string())?;
        }
        if let Some(moves) = record.best_moves_count {
            self.store.set(&Self::moves_key(difficulty), &moves.to_string())?;
        }
        log::info!("High scores saved for {}: {:?}", difficulty.as_str(), record);
        Ok(())
    }

    /// Compare a winning result against the stored record and persist only
    /// the metrics it improved.
    pub fn record_win(
        &mut self,
        difficulty: Difficulty,
        seconds: u32,
        moves: u32,
    ) -> Result<HighScoreUpdate, StorageError> {
        let current = self.load(difficulty);
        let update = HighScoreUpdate {
            new_best_time: current.is_new_best_time(seconds),
            new_best_moves: current.is_new_best_moves(moves),
        };
        if !update.any() {
            return Ok(update);
        }

        let improved = HighScoreRecord {
            best_time_seconds: update.new_best_time.then_some(seconds),
            best_moves_count: update.new_best_moves.then_some(moves),
        };
        self.save(difficulty, &improved)?;
        Ok(update)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn read_metric(&self, key: &str) -> Option<u32> {
        match self.store.get(key) {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!("Ignoring unparsable high score {raw:?} under {key}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::error!("Could not read high score {key}: {err}");
                None
            }
        }
    }
}
