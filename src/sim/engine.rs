//! Reveal/match state machine
//!
//! Every operation either changes the session and returns the effects the
//! host must carry out, or is an ignored action and returns nothing.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::event::{Deferred, Effect, GameEvent, SoundCue};
use super::snapshot::{Snapshot, WinSummary};
use super::state::{GameSession, PendingResolution, SessionPhase};
use crate::consts::*;
use crate::deck::{CardStatus, SYMBOL_CATALOG, Symbol, generate_deck_from, validate_catalog};
use crate::error::Result;
use crate::highscores::{HighScoreRecord, ScoreStore};
use crate::persistence::KeyValueStore;
use crate::settings::{Difficulty, Settings, Theme};

pub struct GameEngine<S: KeyValueStore> {
    session: GameSession,
    settings: Settings,
    scores: ScoreStore<S>,
    rng: Pcg32,
    catalog: &'static [Symbol],
    last_generation: u64,
}

impl<S: KeyValueStore> GameEngine<S> {
    /// Create an engine on the built-in catalog. Opens a session on the
    /// persisted difficulty.
    pub fn new(store: S, seed: u64) -> Result<Self> {
        Self::with_catalog(store, seed, &SYMBOL_CATALOG)
    }

    /// Create an engine drawing symbols from `catalog`. Fails with
    /// [`GameError::Configuration`](crate::error::GameError::Configuration)
    /// when the catalog cannot serve every difficulty.
    pub fn with_catalog(store: S, seed: u64, catalog: &'static [Symbol]) -> Result<Self> {
        validate_catalog(catalog)?;

        let settings = Settings::load(&store);
        let scores = ScoreStore::new(store);
        let mut rng = Pcg32::seed_from_u64(seed);

        let difficulty = settings.difficulty;
        let deck = generate_deck_from(catalog, difficulty, &mut rng)?;
        let baseline = scores.load(difficulty);
        let session = GameSession::new(1, difficulty, deck, baseline);
        log::info!("Engine ready: {} board, seed {seed}", difficulty.as_str());

        Ok(Self {
            session,
            settings,
            scores,
            rng,
            catalog,
            last_generation: 1,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty
    }

    /// Best results for the active difficulty, including a just-won session
    pub fn high_score(&self) -> HighScoreRecord {
        self.session.best_record()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_session(&self.session)
    }

    pub fn win_summary(&self) -> Option<WinSummary> {
        WinSummary::from_session(&self.session)
    }

    pub fn store(&self) -> &S {
        self.scores.store()
    }

    /// Dispatch an input event
    pub fn handle(&mut self, event: GameEvent) -> Vec<Effect> {
        match event {
            GameEvent::Reveal(id) => self.reveal_card(id),
            GameEvent::Restart(difficulty) => self.restart_game(difficulty),
            GameEvent::SetDifficulty(difficulty) => self.set_difficulty(difficulty),
            GameEvent::Fire(action) => self.fire(action),
        }
    }

    /// Flip card `id` face up.
    ///
    /// Ignored while a pair is being resolved, when `id` is already in the
    /// buffer, or when the card is not hidden.
    pub fn reveal_card(&mut self, id: usize) -> Vec<Effect> {
        let session = &mut self.session;

        if session.locked {
            log::debug!("Ignoring reveal of {id}: resolving a pair");
            return Vec::new();
        }
        if session.buffer.contains(id) {
            log::debug!("Ignoring reveal of {id}: already face up");
            return Vec::new();
        }
        let Some(card) = session.deck.get_mut(id) else {
            log::debug!("Ignoring reveal of {id}: no such card");
            return Vec::new();
        };
        if card.status != CardStatus::Hidden {
            log::debug!("Ignoring reveal of {id}: card is {:?}", card.status);
            return Vec::new();
        }
        if !session.buffer.push(id) {
            return Vec::new();
        }
        card.status = CardStatus::Revealed;

        let generation = session.generation;
        let mut effects = Vec::new();
        if self.settings.sound_enabled {
            effects.push(Effect::Sound(SoundCue::Flip));
        }

        if session.phase == SessionPhase::Idle {
            session.phase = SessionPhase::Active;
            effects.push(Effect::ScheduleRepeating {
                action: Deferred::Tick { generation },
                interval_ms: TICK_INTERVAL_MS,
            });
            log::info!("Session {generation} started");
        }

        if let Some((first, second)) = session.buffer.pair() {
            session.move_count += 1;
            session.locked = true;

            let matched = match (session.deck.get(first), session.deck.get(second)) {
                (Some(a), Some(b)) => a.symbol == b.symbol,
                _ => false,
            };
            session.pending = Some(PendingResolution {
                first,
                second,
                matched,
            });
            log::debug!(
                "Move {}: cards {first} and {second} {}",
                session.move_count,
                if matched { "match" } else { "differ" }
            );

            effects.push(Effect::Schedule {
                action: Deferred::Resolve { generation },
                delay_ms: if matched {
                    MATCH_DELAY_MS
                } else {
                    MISMATCH_DELAY_MS
                },
            });
        }

        effects
    }

    /// Throw away the current session and deal a fresh one on `difficulty`.
    /// Everything still scheduled for the old session is cancelled.
    pub fn restart_game(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        let deck = match generate_deck_from(self.catalog, difficulty, &mut self.rng) {
            Ok(deck) => deck,
            Err(err) => {
                log::error!("Could not deal a {} deck: {err}", difficulty.as_str());
                return Vec::new();
            }
        };

        let previous = self.session.generation;
        self.last_generation += 1;
        let baseline = self.scores.load(difficulty);
        self.session = GameSession::new(self.last_generation, difficulty, deck, baseline);
        log::info!(
            "Session {} dealt on {} (replaces {previous})",
            self.last_generation,
            difficulty.as_str()
        );

        vec![Effect::CancelGeneration {
            generation: previous,
        }]
    }

    /// Remember `difficulty` as the preferred level and restart on it
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        self.settings.difficulty = difficulty;
        if let Err(err) = self.settings.save_difficulty(self.scores.store_mut()) {
            log::error!("Could not save difficulty: {err}");
        }
        self.restart_game(difficulty)
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        if let Err(err) = self.settings.save_sound_enabled(self.scores.store_mut()) {
            log::error!("Could not save sound setting: {err}");
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        if let Err(err) = self.settings.save_theme(self.scores.store_mut()) {
            log::error!("Could not save theme: {err}");
        }
    }

    /// Run a deferred action. Actions from a superseded session are dropped.
    pub fn fire(&mut self, action: Deferred) -> Vec<Effect> {
        if action.generation() != self.session.generation {
            log::warn!(
                "Dropping stale {:?} (current session {})",
                action,
                self.session.generation
            );
            return Vec::new();
        }
        match action {
            Deferred::Resolve { .. } => self.resolve(),
            Deferred::Tick { .. } => self.tick(),
        }
    }

    fn resolve(&mut self) -> Vec<Effect> {
        let session = &mut self.session;
        let Some(pending) = session.pending.take() else {
            log::warn!("Resolve fired with no pending pair");
            return Vec::new();
        };

        let status = if pending.matched {
            CardStatus::Matched
        } else {
            CardStatus::Hidden
        };
        for id in [pending.first, pending.second] {
            if let Some(card) = session.deck.get_mut(id) {
                card.status = status;
            }
        }
        session.buffer.clear();
        session.locked = false;

        let mut effects = Vec::new();
        if pending.matched {
            if self.settings.sound_enabled {
                effects.push(Effect::Sound(SoundCue::Match));
            }
            if self.session.deck.all_matched() {
                self.finish_win(&mut effects);
            }
        }
        effects
    }

    fn tick(&mut self) -> Vec<Effect> {
        if self.session.phase != SessionPhase::Active {
            return Vec::new();
        }
        self.session.elapsed_seconds += 1;
        Vec::new()
    }

    fn finish_win(&mut self, effects: &mut Vec<Effect>) {
        let session = &mut self.session;
        session.phase = SessionPhase::Won;
        effects.push(Effect::StopTicker {
            generation: session.generation,
        });
        log::info!(
            "Won {} in {}s with {} moves",
            session.difficulty.as_str(),
            session.elapsed_seconds,
            session.move_count
        );

        let (difficulty, seconds, moves) = (
            session.difficulty,
            session.elapsed_seconds,
            session.move_count,
        );
        if let Err(err) = self.scores.record_win(difficulty, seconds, moves) {
            log::error!("Could not save high scores, not reporting new bests: {err}");
            self.session.score_tracking = false;
        }

        if self.settings.sound_enabled {
            effects.push(Effect::Sound(SoundCue::Win));
        }
        if let Some(summary) = WinSummary::from_session(&self.session) {
            effects.push(Effect::Won(summary));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::error::GameError;
    use crate::persistence::MemoryStore;

    fn engine() -> GameEngine<MemoryStore> {
        GameEngine::new(MemoryStore::new(), 12345).unwrap()
    }

    /// Replace the dealt deck with a known layout
    fn rig(engine: &mut GameEngine<MemoryStore>, symbols: &[Symbol]) {
        engine.session.deck = Deck::from_symbols(symbols);
    }

    fn resolve_now(engine: &mut GameEngine<MemoryStore>) -> Vec<Effect> {
        let generation = engine.session().generation;
        engine.fire(Deferred::Resolve { generation })
    }

    #[test]
    fn test_first_reveal_starts_timer() {
        let mut engine = engine();
        assert_eq!(engine.session().phase, SessionPhase::Idle);

        let effects = engine.reveal_card(0);
        assert_eq!(engine.session().phase, SessionPhase::Active);
        assert_eq!(engine.session().buffer.as_slice(), &[0]);
        assert!(engine.session().is_clickable());
        assert!(effects.contains(&Effect::ScheduleRepeating {
            action: Deferred::Tick { generation: 1 },
            interval_ms: TICK_INTERVAL_MS,
        }));
    }

    #[test]
    fn test_second_reveal_locks_and_schedules() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        let effects = engine.reveal_card(1);
        assert!(engine.session().locked);
        assert_eq!(engine.session().move_count, 1);
        assert!(!engine.session().is_clickable());
        assert!(effects.contains(&Effect::Schedule {
            action: Deferred::Resolve { generation: 1 },
            delay_ms: MISMATCH_DELAY_MS,
        }));
    }

    #[test]
    fn test_match_uses_short_delay() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        let effects = engine.reveal_card(2);
        assert!(effects.contains(&Effect::Schedule {
            action: Deferred::Resolve { generation: 1 },
            delay_ms: MATCH_DELAY_MS,
        }));
    }

    #[test]
    fn test_ignored_reveals() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        // Same card again
        assert!(engine.reveal_card(0).is_empty());
        // Out of range
        assert!(engine.reveal_card(99).is_empty());
        assert_eq!(engine.session().buffer.len(), 1);

        engine.reveal_card(1);
        // Third card while locked
        let before = engine.snapshot();
        assert!(engine.reveal_card(2).is_empty());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_matched_card_cannot_be_revealed() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        engine.reveal_card(2);
        resolve_now(&mut engine);
        assert!(engine.reveal_card(0).is_empty());
        assert_eq!(engine.session().move_count, 1);
    }

    #[test]
    fn test_mismatch_resolution() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        engine.reveal_card(1);
        resolve_now(&mut engine);

        let session = engine.session();
        assert_eq!(session.deck.get(0).unwrap().status, CardStatus::Hidden);
        assert_eq!(session.deck.get(1).unwrap().status, CardStatus::Hidden);
        assert!(session.buffer.is_empty());
        assert!(!session.locked);
        assert_eq!(session.move_count, 1);
    }

    #[test]
    fn test_match_resolution() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        engine.reveal_card(2);
        let effects = resolve_now(&mut engine);

        let session = engine.session();
        assert_eq!(session.deck.get(0).unwrap().status, CardStatus::Matched);
        assert_eq!(session.deck.get(2).unwrap().status, CardStatus::Matched);
        assert!(session.buffer.is_empty());
        assert!(!session.locked);
        assert!(!session.won());
        assert!(effects.contains(&Effect::Sound(SoundCue::Match)));
    }

    #[test]
    fn test_last_pair_wins_and_records() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        engine.reveal_card(2);
        resolve_now(&mut engine);
        engine.fire(Deferred::Tick { generation: 1 });
        engine.fire(Deferred::Tick { generation: 1 });
        engine.reveal_card(1);
        engine.reveal_card(3);
        let effects = resolve_now(&mut engine);

        assert!(engine.session().won());
        assert!(effects.contains(&Effect::StopTicker { generation: 1 }));
        assert!(effects.contains(&Effect::Sound(SoundCue::Win)));
        let summary = engine.win_summary().unwrap();
        assert_eq!(summary.elapsed_seconds, 2);
        assert_eq!(summary.move_count, 2);
        assert!(summary.is_new_best_time);
        assert!(summary.is_new_best_moves);
        assert!(effects.contains(&Effect::Won(summary)));

        // Late tick does not move the clock
        engine.fire(Deferred::Tick { generation: 1 });
        assert_eq!(engine.session().elapsed_seconds, 2);

        assert_eq!(
            engine.store().get("bestTime_easy").unwrap().as_deref(),
            Some("2")
        );
        assert_eq!(
            engine.store().get("bestMoves_easy").unwrap().as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_unsaved_win_reports_no_best() {
        let mut engine = GameEngine::new(MemoryStore::read_only(), 7).unwrap();
        rig(&mut engine, &["a", "a"]);

        engine.reveal_card(0);
        engine.fire(Deferred::Tick { generation: 1 });
        engine.reveal_card(1);
        let effects = resolve_now(&mut engine);

        let summary = engine.win_summary().unwrap();
        assert!(!summary.is_new_best_time);
        assert!(!summary.is_new_best_moves);
        assert!(effects.contains(&Effect::Won(summary)));
        assert!(engine.high_score().is_empty());
        assert!(engine.snapshot().high_score.is_empty());
    }

    #[test]
    fn test_stale_resolve_is_dropped() {
        let mut engine = engine();
        rig(&mut engine, &["a", "b", "a", "b"]);

        engine.reveal_card(0);
        engine.reveal_card(1);
        let effects = engine.restart_game(Difficulty::Easy);
        assert_eq!(effects, vec![Effect::CancelGeneration { generation: 1 }]);

        let fresh = engine.snapshot();
        assert!(engine.fire(Deferred::Resolve { generation: 1 }).is_empty());
        assert!(engine.fire(Deferred::Tick { generation: 1 }).is_empty());
        assert_eq!(engine.snapshot(), fresh);
        assert_eq!(engine.session().move_count, 0);
        assert_eq!(engine.session().generation, 2);
    }

    #[test]
    fn test_ticks_only_while_active() {
        let mut engine = engine();
        engine.fire(Deferred::Tick { generation: 1 });
        assert_eq!(engine.session().elapsed_seconds, 0);

        engine.reveal_card(0);
        engine.fire(Deferred::Tick { generation: 1 });
        assert_eq!(engine.session().elapsed_seconds, 1);
    }

    #[test]
    fn test_sound_cues_follow_setting() {
        let mut engine = engine();
        engine.set_sound_enabled(false);
        let effects = engine.reveal_card(0);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Sound(_))));
        assert_eq!(
            engine.store().get("soundEnabled").unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_set_difficulty_persists_and_restarts() {
        let mut engine = engine();
        engine.reveal_card(0);
        engine.set_difficulty(Difficulty::Hard);

        assert_eq!(engine.difficulty(), Difficulty::Hard);
        assert_eq!(engine.session().deck.len(), 64);
        assert_eq!(engine.session().phase, SessionPhase::Idle);
        assert_eq!(
            engine.store().get("difficulty").unwrap().as_deref(),
            Some("hard")
        );

        // The persisted difficulty is used on the next start
        let store = engine.scores.store().clone();
        let reopened = GameEngine::new(store, 1).unwrap();
        assert_eq!(reopened.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_handle_dispatches() {
        let mut engine = engine();
        engine.handle(GameEvent::Reveal(0));
        assert!(engine.session().started());
        engine.handle(GameEvent::Restart(Difficulty::Medium));
        assert_eq!(engine.session().deck.len(), 36);
    }

    #[test]
    fn test_small_catalog_rejected() {
        static SHORT: [Symbol; 3] = ["a", "b", "c"];
        let err = GameEngine::with_catalog(MemoryStore::new(), 1, &SHORT)
            .err()
            .unwrap();
        assert_eq!(
            err,
            GameError::Configuration {
                required: 32,
                available: 3,
            }
        );
    }

    #[test]
    fn test_repeated_catalog_rejected() {
        static REPEATS: [Symbol; 32] = ["a"; 32];
        assert!(GameEngine::with_catalog(MemoryStore::new(), 1, &REPEATS).is_err());
    }
}
