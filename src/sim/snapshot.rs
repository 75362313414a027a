//! Read-only views handed to the presentation layer

use serde::Serialize;

use super::state::GameSession;
use crate::deck::Card;
use crate::highscores::HighScoreRecord;
use crate::settings::Difficulty;

/// Result of a won session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinSummary {
    pub difficulty: Difficulty,
    pub elapsed_seconds: u32,
    pub move_count: u32,
    pub is_new_best_time: bool,
    pub is_new_best_moves: bool,
}

impl WinSummary {
    /// Summary of `session`, or `None` unless it has been won
    pub fn from_session(session: &GameSession) -> Option<Self> {
        session.won().then(|| Self {
            difficulty: session.difficulty,
            elapsed_seconds: session.elapsed_seconds,
            move_count: session.move_count,
            is_new_best_time: session.is_new_best_time(),
            is_new_best_moves: session.is_new_best_moves(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub difficulty: Difficulty,
    pub grid_columns: usize,
    pub cards: Vec<Card>,
    pub move_count: u32,
    pub elapsed_seconds: u32,
    pub started: bool,
    pub won: bool,
    pub is_clickable: bool,
    pub high_score: HighScoreRecord,
    pub win: Option<WinSummary>,
}

impl Snapshot {
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            difficulty: session.difficulty,
            grid_columns: session.difficulty.config().grid_columns,
            cards: session.deck.cards().to_vec(),
            move_count: session.move_count,
            elapsed_seconds: session.elapsed_seconds,
            started: session.started(),
            won: session.won(),
            is_clickable: session.is_clickable(),
            high_score: session.best_record(),
            win: WinSummary::from_session(session),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::sim::state::SessionPhase;

    #[test]
    fn test_snapshot_json_shape() {
        let session = GameSession::new(
            1,
            Difficulty::Medium,
            Deck::from_symbols(&["🍕", "🍕"]),
            HighScoreRecord::default(),
        );
        let json = Snapshot::from_session(&session).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["difficulty"], "medium");
        assert_eq!(value["gridColumns"], 6);
        assert_eq!(value["isClickable"], true);
        assert_eq!(value["cards"][0]["status"], "hidden");
        assert_eq!(value["cards"][1]["symbol"], "🍕");
        assert!(value["highScore"]["bestTimeSeconds"].is_null());
        assert!(value["win"].is_null());
    }

    #[test]
    fn test_win_summary_only_when_won() {
        let mut session = GameSession::new(
            1,
            Difficulty::Easy,
            Deck::from_symbols(&["a", "a"]),
            HighScoreRecord {
                best_time_seconds: Some(10),
                best_moves_count: Some(1),
            },
        );
        assert!(WinSummary::from_session(&session).is_none());

        session.phase = SessionPhase::Won;
        session.elapsed_seconds = 12;
        session.move_count = 1;
        let summary = WinSummary::from_session(&session).unwrap();
        assert!(!summary.is_new_best_time);
        assert!(!summary.is_new_best_moves);
    }
}
