//! Game settings and preferences
//!
//! Each preference is stored as a plain scalar under its own key so the
//! layout stays readable from the browser's storage inspector.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Board shape for a difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    /// Number of columns the grid is laid out in
    pub grid_columns: usize,
    /// Number of distinct symbols (each appears twice)
    pub emoji_count: usize,
}

impl DifficultyConfig {
    /// Total number of cards on the board
    pub fn card_count(&self) -> usize {
        self.emoji_count * 2
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                grid_columns: 4,
                emoji_count: 8,
            },
            Difficulty::Medium => DifficultyConfig {
                grid_columns: 6,
                emoji_count: 18,
            },
            Difficulty::Hard => DifficultyConfig {
                grid_columns: 8,
                emoji_count: 32,
            },
        }
    }
}

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the OS color scheme
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" | "auto" => Some(Theme::System),
            _ => None,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Difficulty used for new sessions
    pub difficulty: Difficulty,
    /// Whether sound cues are emitted
    pub sound_enabled: bool,
    /// Color theme
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            sound_enabled: true,
            theme: Theme::System,
        }
    }
}

impl Settings {
    pub const DIFFICULTY_KEY: &'static str = "difficulty";
    pub const SOUND_ENABLED_KEY: &'static str = "soundEnabled";
    pub const THEME_KEY: &'static str = "theme";

    /// Load settings, falling back to defaults for missing or unreadable keys
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();

        let difficulty = read_key(store, Self::DIFFICULTY_KEY, Difficulty::from_str)
            .unwrap_or(defaults.difficulty);
        let sound_enabled = read_key(store, Self::SOUND_ENABLED_KEY, parse_bool)
            .unwrap_or(defaults.sound_enabled);
        let theme = read_key(store, Self::THEME_KEY, Theme::from_str).unwrap_or(defaults.theme);

        let settings = Self {
            difficulty,
            sound_enabled,
            theme,
        };
        log::info!(
            "Loaded settings: difficulty={}, sound={}, theme={}",
            settings.difficulty.as_str(),
            settings.sound_enabled,
            settings.theme.as_str()
        );
        settings
    }

    /// Persist every preference
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        self.save_difficulty(store)?;
        self.save_sound_enabled(store)?;
        self.save_theme(store)?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn save_difficulty<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), StorageError> {
        store.set(Self::DIFFICULTY_KEY, self.difficulty.as_str())
    }

    pub fn save_sound_enabled<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), StorageError> {
        store.set(
            Self::SOUND_ENABLED_KEY,
            if self.sound_enabled { "true" } else { "false" },
        )
    }

    pub fn save_theme<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StorageError> {
        store.set(Self::THEME_KEY, self.theme.as_str())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Read and parse one key. Missing keys, parse failures and storage errors
/// all read as `None`.
fn read_key<S, T>(store: &S, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T>
where
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) => {
            let parsed = parse(&raw);
            if parsed.is_none() {
                log::warn!("Ignoring unrecognized value {raw:?} for setting {key}");
            }
            parsed
        }
        Ok(None) => None,
        Err(err) => {
            log::error!("Could not read setting {key}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_difficulty_table() {
        assert_eq!(Difficulty::Easy.config().grid_columns, 4);
        assert_eq!(Difficulty::Easy.config().emoji_count, 8);
        assert_eq!(Difficulty::Medium.config().grid_columns, 6);
        assert_eq!(Difficulty::Medium.config().emoji_count, 18);
        assert_eq!(Difficulty::Hard.config().grid_columns, 8);
        assert_eq!(Difficulty::Hard.config().card_count(), 64);
    }

    #[test]
    fn test_difficulty_str_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
        assert!(Settings::default().sound_enabled);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Hard,
            sound_enabled: false,
            theme: Theme::Dark,
        };
        settings.save(&mut store).unwrap();

        assert_eq!(store.get("difficulty").unwrap().as_deref(), Some("hard"));
        assert_eq!(store.get("soundEnabled").unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_garbage_values_fall_back_per_key() {
        let mut store = MemoryStore::new();
        store.set("difficulty", "impossible").unwrap();
        store.set("theme", "light").unwrap();

        let settings = Settings::load(&store);
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn test_unreadable_store_loads_defaults() {
        let mut store = MemoryStore::unreadable();
        store.set("difficulty", "hard").unwrap();
        store.set("soundEnabled", "false").unwrap();

        assert_eq!(Settings::load(&store), Settings::default());
    }
}
