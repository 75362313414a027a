//! Card and deck generation
//!
//! A deck for a difficulty holds two copies of the first `emoji_count`
//! symbols of [`SYMBOL_CATALOG`], shuffled. Because every difficulty slices
//! the same ordered catalog, harder levels only add symbols.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::error::{GameError, Result};
use crate::settings::Difficulty;
use crate::shuffle::shuffle;

/// Opaque card face
pub type Symbol = &'static str;

/// Ordered symbol catalog. Easy uses the first 8, medium the first 18, hard
/// all 32.
pub const SYMBOL_CATALOG: [Symbol; 32] = [
    // Easy
    "🍕", "🍔", "🍣", "🍩", "🌮", "🍿", "🍦", "🍫",
    // Medium adds
    "🍇", "🍉", "🍌", "🍎", "🍓", "🥑", "🥝", "🍒", "🍋", "🍊",
    // Hard adds
    "🥭", "🍍", "🥥", "🥕", "🌽", "🥔", "🧀", "🥞", "🥐", "🥨", "🍪", "🧁", "🍰", "🍭",
];

/// Face state of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Position on the board, stable for the whole session
    pub id: usize,
    pub symbol: Symbol,
    pub status: CardStatus,
}

impl Card {
    pub fn new(id: usize, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            status: CardStatus::Hidden,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.status == CardStatus::Hidden
    }

    pub fn is_matched(&self) -> bool {
        self.status == CardStatus::Matched
    }
}

/// Ordered cards of one session. `cards[i].id == i` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from symbols already in board order
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let cards = symbols
            .iter()
            .enumerate()
            .map(|(id, &symbol)| Card::new(id, symbol))
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: usize) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// True once every card is matched (and the deck is non-empty)
    pub fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(Card::is_matched)
    }

    /// Id of the other card carrying `id`'s symbol
    pub fn partner_of(&self, id: usize) -> Option<usize> {
        let symbol = self.get(id)?.symbol;
        self.cards
            .iter()
            .find(|c| c.id != id && c.symbol == symbol)
            .map(|c| c.id)
    }
}

/// Ensure `catalog` can serve every difficulty: the symbols dealt on the
/// hardest level must all be distinct
pub fn validate_catalog(catalog: &[Symbol]) -> Result<()> {
    let required = Difficulty::ALL
        .iter()
        .map(|d| d.config().emoji_count)
        .max()
        .unwrap_or(0);
    let available = catalog.iter().take(required).collect::<HashSet<_>>().len();
    if available < required {
        log::error!("Symbol catalog has {available} distinct symbols, {required} required");
        return Err(GameError::Configuration {
            required,
            available,
        });
    }
    Ok(())
}

/// Generate a shuffled deck for `difficulty` from the built-in catalog
pub fn generate_deck<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Result<Deck> {
    generate_deck_from(&SYMBOL_CATALOG, difficulty, rng)
}

/// Generate a shuffled deck for `difficulty` from `catalog`
pub fn generate_deck_from<R: Rng + ?Sized>(
    catalog: &[Symbol],
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Deck> {
    validate_catalog(catalog)?;

    let emoji_count = difficulty.config().emoji_count;
    let symbols = &catalog[..emoji_count];

    // Pairs are concatenated, then shuffled
    let mut pairs = Vec::with_capacity(emoji_count * 2);
    pairs.extend_from_slice(symbols);
    pairs.extend_from_slice(symbols);

    let deck = Deck::from_symbols(&shuffle(&pairs, rng));
    log::debug!("Generated {} deck with {} cards", difficulty.as_str(), deck.len());
    Ok(deck)
}
