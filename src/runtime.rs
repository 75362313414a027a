//! Timer host for the engine
//!
//! Applies engine [`Effect`]s to a queue of pending timers on a virtual
//! millisecond clock. The host advances the clock by the real frame delta
//! and due timers fire in order, so the whole game runs deterministically
//! from a seed and a sequence of inputs.

use crate::persistence::KeyValueStore;
use crate::settings::{Difficulty, Theme};
use crate::sim::{Deferred, Effect, GameEngine, GameEvent, Snapshot, SoundCue, WinSummary};

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due_ms: u64,
    /// Insertion order, breaks ties between timers due at the same instant
    seq: u64,
    action: Deferred,
    repeat_ms: Option<u32>,
}

pub struct GameRuntime<S: KeyValueStore> {
    engine: GameEngine<S>,
    now_ms: u64,
    timers: Vec<PendingTimer>,
    next_seq: u64,
    sounds: Vec<SoundCue>,
    wins: Vec<WinSummary>,
}

impl<S: KeyValueStore> GameRuntime<S> {
    pub fn new(engine: GameEngine<S>) -> Self {
        Self {
            engine,
            now_ms: 0,
            timers: Vec::new(),
            next_seq: 0,
            sounds: Vec::new(),
            wins: Vec::new(),
        }
    }

    pub fn engine(&self) -> &GameEngine<S> {
        &self.engine
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn handle(&mut self, event: GameEvent) {
        let effects = self.engine.handle(event);
        self.apply(effects);
    }

    pub fn reveal_card(&mut self, id: usize) {
        self.handle(GameEvent::Reveal(id));
    }

    pub fn restart_game(&mut self, difficulty: Difficulty) {
        self.handle(GameEvent::Restart(difficulty));
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.handle(GameEvent::SetDifficulty(difficulty));
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.engine.set_sound_enabled(enabled);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.engine.set_theme(theme);
    }

    /// Move the clock forward by `dt_ms`, firing every timer that comes due.
    /// Returns how many timers fired.
    pub fn advance(&mut self, dt_ms: u64) -> usize {
        let target = self.now_ms.saturating_add(dt_ms);
        let mut fired = 0;

        while let Some(index) = self.next_due(target) {
            let timer = self.timers.swap_remove(index);
            self.now_ms = timer.due_ms;

            // Re-arm before firing so the handler can still cancel it
            if let Some(interval) = timer.repeat_ms {
                let interval = interval.max(1);
                self.push_timer(timer.action, timer.due_ms + u64::from(interval), Some(interval));
            }

            let effects = self.engine.fire(timer.action);
            self.apply(effects);
            fired += 1;
        }

        self.now_ms = target;
        fired
    }

    /// Sound cues emitted since the last call
    pub fn drain_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    /// Wins reported since the last call
    pub fn drain_wins(&mut self) -> Vec<WinSummary> {
        std::mem::take(&mut self.wins)
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Schedule { action, delay_ms } => {
                    let due = self.now_ms + u64::from(delay_ms);
                    self.push_timer(action, due, None);
                }
                Effect::ScheduleRepeating {
                    action,
                    interval_ms,
                } => {
                    let interval = interval_ms.max(1);
                    let due = self.now_ms + u64::from(interval);
                    self.push_timer(action, due, Some(interval));
                }
                Effect::CancelGeneration { generation } => {
                    let before = self.timers.len();
                    self.timers.retain(|t| t.action.generation() != generation);
                    log::debug!(
                        "Cancelled {} timers of session {generation}",
                        before - self.timers.len()
                    );
                }
                Effect::StopTicker { generation } => {
                    self.timers
                        .retain(|t| t.action != Deferred::Tick { generation });
                }
                Effect::Sound(cue) => self.sounds.push(cue),
                Effect::Won(summary) => self.wins.push(summary),
            }
        }
    }

    fn push_timer(&mut self, action: Deferred, due_ms: u64, repeat_ms: Option<u32>) {
        self.timers.push(PendingTimer {
            due_ms,
            seq: self.next_seq,
            action,
            repeat_ms,
        });
        self.next_seq += 1;
    }

    fn next_due(&self, until_ms: u64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(i, _)| i)
    }
}
