//! Card Deck
//!
//! The fixed, ordered set of legal vote values. The deck is identical for
//! every agreement mode: a numeric progression followed by two special
//! tokens.

pub mod card;

pub use card::Card;

use crate::core::error::DomainError;

/// Numeric faces, in deck order.
pub const NUMERIC_VALUES: [u16; 10] = [0, 1, 2, 3, 5, 8, 13, 20, 40, 100];

const CARDS: [Card; 12] = [
    Card::Number(0),
    Card::Number(1),
    Card::Number(2),
    Card::Number(3),
    Card::Number(5),
    Card::Number(8),
    Card::Number(13),
    Card::Number(20),
    Card::Number(40),
    Card::Number(100),
    Card::Break,
    Card::Unknown,
];

/// The planning-poker deck
///
/// # Example
///
/// ```
/// use poker_domain::deck::{Card, Deck};
///
/// assert_eq!(Deck::values().len(), 12);
/// assert!(Deck::is_valid(&Card::Number(13)));
/// assert!(!Deck::is_valid(&Card::Number(7)));
/// assert_eq!(Deck::nearest(6.0), 5);
/// ```
pub struct Deck;

impl Deck {
    /// All legal cards in deck order.
    pub fn values() -> &'static [Card] {
        &CARDS
    }

    pub fn is_valid(card: &Card) -> bool {
        match card {
            Card::Number(n) => NUMERIC_VALUES.contains(n),
            Card::Break | Card::Unknown => true,
        }
    }

    /// Parse a card face and check deck membership.
    pub fn card(face: &str) -> Result<Card, DomainError> {
        let card: Card = face.parse()?;
        if Self::is_valid(&card) {
            Ok(card)
        } else {
            Err(DomainError::InvalidCard(face.to_string()))
        }
    }

    /// Nearest numeric face; an exact midpoint goes to the larger face.
    pub fn nearest(value: f64) -> u16 {
        let mut best = NUMERIC_VALUES[0];
        let mut best_distance = f64::INFINITY;
        for &face in &NUMERIC_VALUES {
            let distance = (f64::from(face) - value).abs();
            if distance <= best_distance {
                best = face;
                best_distance = distance;
            }
        }
        best
    }

    /// Largest numeric face not above `value` (the smallest face if none is).
    pub fn floor(value: f64) -> u16 {
        NUMERIC_VALUES
            .iter()
            .rev()
            .copied()
            .find(|&face| f64::from(face) <= value)
            .unwrap_or(NUMERIC_VALUES[0])
    }
}
