//! Card faces

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single card a participant can play.
///
/// Cards travel as strings on the wire: numeric faces as their number,
/// the break card as `"coffee"` and the cannot-estimate card as `"?"`.
/// Parsing only checks the shape; membership in the deck is checked by
/// [`Deck::is_valid`](super::Deck::is_valid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Card {
    /// A numeric estimate
    Number(u16),
    /// "I need a break"
    Break,
    /// "I cannot estimate this"
    Unknown,
}

impl Card {
    /// Numeric value of the card, `None` for the special tokens.
    pub fn numeric(&self) -> Option<u16> {
        match self {
            Card::Number(n) => Some(*n),
            Card::Break | Card::Unknown => None,
        }
    }

    pub fn is_special(&self) -> bool {
        self.numeric().is_none()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Number(n) => write!(f, "{}", n),
            Card::Break => write!(f, "coffee"),
            Card::Unknown => write!(f, "?"),
        }
    }
}

impl std::str::FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coffee" | "break" | "cafe" => Ok(Card::Break),
            "?" | "unknown" => Ok(Card::Unknown),
            other => other
                .parse::<u16>()
                .map(Card::Number)
                .map_err(|_| DomainError::InvalidCard(s.to_string())),
        }
    }
}

impl TryFrom<String> for Card {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_faces() {
        assert_eq!("5".parse::<Card>().unwrap(), Card::Number(5));
        assert_eq!("coffee".parse::<Card>().unwrap(), Card::Break);
        assert_eq!("Break".parse::<Card>().unwrap(), Card::Break);
        assert_eq!("?".parse::<Card>().unwrap(), Card::Unknown);
        assert!(matches!(
            "five".parse::<Card>(),
            Err(DomainError::InvalidCard(_))
        ));
    }

    #[test]
    fn test_display_matches_wire_form() {
        assert_eq!(Card::Number(13).to_string(), "13");
        assert_eq!(Card::Break.to_string(), "coffee");
        assert_eq!(Card::Unknown.to_string(), "?");
    }

    #[test]
    fn test_serde_string_form() {
        assert_eq!(serde_json::to_string(&Card::Number(8)).unwrap(), "\"8\"");
        let card: Card = serde_json::from_str("\"?\"").unwrap();
        assert_eq!(card, Card::Unknown);
    }

    #[test]
    fn test_numeric() {
        assert_eq!(Card::Number(3).numeric(), Some(3));
        assert!(Card::Break.is_special());
        assert!(Card::Unknown.numeric().is_none());
    }
}
