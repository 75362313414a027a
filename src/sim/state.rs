//! Session state
//!
//! A [`GameSession`] is one playthrough from deck generation to a win or a
//! restart. Only the engine mutates it.

use serde::Serialize;

use crate::deck::Deck;
use crate::highscores::HighScoreRecord;
use crate::settings::Difficulty;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionPhase {
    /// No card flipped yet, timer not running
    #[default]
    Idle,
    /// Timer running
    Active,
    /// Every card matched, timer stopped
    Won,
}

/// Face-up, unresolved card ids (at most two, in reveal order)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RevealBuffer {
    ids: Vec<usize>,
}

impl RevealBuffer {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self {
            ids: Vec::with_capacity(Self::CAPACITY),
        }
    }

    /// Append `id`. Refused (returns false) when full or already present.
    pub fn push(&mut self, id: usize) -> bool {
        if self.is_full() || self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= Self::CAPACITY
    }

    /// Both ids once the buffer is full
    pub fn pair(&self) -> Option<(usize, usize)> {
        match self.ids.as_slice() {
            [first, second] => Some((*first, *second)),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// The pair captured when the second card was revealed, waiting for its
/// delay to elapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingResolution {
    pub first: usize,
    pub second: usize,
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Identifies this session; deferred actions from older sessions carry a
    /// different value and are dropped
    pub generation: u64,
    pub difficulty: Difficulty,
    pub deck: Deck,
    pub buffer: RevealBuffer,
    /// Set while a pair is waiting to be resolved
    pub locked: bool,
    pub phase: SessionPhase,
    pub move_count: u32,
    pub elapsed_seconds: u32,
    pub pending: Option<PendingResolution>,
    /// Best results as they stood when this session started
    pub baseline: HighScoreRecord,
    /// Cleared when saving this session's result failed; the session then
    /// reports no new bests
    pub score_tracking: bool,
}

impl GameSession {
    pub fn new(
        generation: u64,
        difficulty: Difficulty,
        deck: Deck,
        baseline: HighScoreRecord,
    ) -> Self {
        Self {
            generation,
            difficulty,
            deck,
            buffer: RevealBuffer::new(),
            locked: false,
            phase: SessionPhase::Idle,
            move_count: 0,
            elapsed_seconds: 0,
            pending: None,
            baseline,
            score_tracking: true,
        }
    }

    pub fn started(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    pub fn won(&self) -> bool {
        self.phase == SessionPhase::Won
    }

    /// Whether a reveal could currently be accepted
    pub fn is_clickable(&self) -> bool {
        !self.locked && self.buffer.len() < RevealBuffer::CAPACITY
    }

    fn counts_for_best(&self) -> bool {
        self.won() && self.score_tracking
    }

    /// Won with a measurable time that beats the time stored at session start
    pub fn is_new_best_time(&self) -> bool {
        self.counts_for_best() && self.baseline.is_new_best_time(self.elapsed_seconds)
    }

    /// Won with fewer moves than stored at session start
    pub fn is_new_best_moves(&self) -> bool {
        self.counts_for_best() && self.baseline.is_new_best_moves(self.move_count)
    }

    /// Best results including this session's outcome if it was won and saved
    pub fn best_record(&self) -> HighScoreRecord {
        if self.counts_for_best() {
            self.baseline.merged_with(self.elapsed_seconds, self.move_count)
        } else {
            self.baseline
        }
    }
}
