//! wasm-bindgen surface for the page script
//!
//! The page owns rendering, audio and the animation loop. It forwards
//! clicks, calls `advance` once per frame with the elapsed milliseconds, and
//! redraws from `snapshot()`.

use wasm_bindgen::prelude::*;

use super::{default_store, random_seed};
use crate::persistence::KeyValueStore;
use crate::runtime::GameRuntime;
use crate::settings::{Difficulty, Theme};
use crate::sim::GameEngine;

/// Longest frame delta accepted, so a backgrounded tab does not replay
/// minutes of ticks at once. Time beyond this per frame is dropped.
const MAX_FRAME_MS: f64 = 1000.0;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Logger init failed: {err}").into());
    }
    log::info!("Memory Match loaded");
}

#[wasm_bindgen]
pub struct WebGame {
    runtime: GameRuntime<Box<dyn KeyValueStore>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsValue> {
        let engine = GameEngine::new(default_store(), random_seed())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self {
            runtime: GameRuntime::new(engine),
        })
    }

    pub fn reveal_card(&mut self, id: usize) {
        self.runtime.reveal_card(id);
    }

    pub fn restart_game(&mut self, difficulty: &str) {
        let difficulty = self.parse_difficulty(difficulty);
        self.runtime.restart_game(difficulty);
    }

    pub fn set_difficulty(&mut self, difficulty: &str) {
        let difficulty = self.parse_difficulty(difficulty);
        self.runtime.set_difficulty(difficulty);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.runtime.set_sound_enabled(enabled);
    }

    pub fn sound_enabled(&self) -> bool {
        self.runtime.engine().settings().sound_enabled
    }

    pub fn set_theme(&mut self, theme: &str) {
        match Theme::from_str(theme) {
            Some(theme) => self.runtime.set_theme(theme),
            None => log::warn!("Unknown theme {theme:?}"),
        }
    }

    pub fn theme(&self) -> String {
        self.runtime.engine().settings().theme.as_str().to_string()
    }

    /// Advance timers by the frame delta, clamped to [`MAX_FRAME_MS`].
    ///
    /// `elapsedSeconds` is therefore a lower bound on wall-clock play time:
    /// while the tab is hidden the page gets few or no frames and the
    /// clamped remainder is never counted.
    pub fn advance(&mut self, dt_ms: f64) {
        let dt = dt_ms.clamp(0.0, MAX_FRAME_MS) as u64;
        self.runtime.advance(dt);
    }

    /// Current state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.runtime
            .snapshot()
            .to_json()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Sound cues since the last call, as a JSON array of names
    pub fn drain_sounds(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.runtime.drain_sounds())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Wins since the last call, as a JSON array of summaries
    pub fn drain_wins(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.runtime.drain_wins())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl WebGame {
    fn parse_difficulty(&self, raw: &str) -> Difficulty {
        Difficulty::from_str(raw).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {raw:?}, keeping current");
            self.runtime.engine().difficulty()
        })
    }
}
