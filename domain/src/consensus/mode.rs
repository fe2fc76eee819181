//! Agreement modes for consensus determination
//!
//! This module defines the policies used to turn a set of revealed votes
//! into one final estimate.

use serde::{Deserialize, Serialize};

/// Policy for deriving a story's final value from the votes
///
/// The mode is chosen at session creation and fixed for the session's lifetime:
/// - `Unanimity`: everyone played the same numeric card (default)
/// - `Median`: median of the numeric cards
/// - `Average`: mean of the numeric cards, rounded per [`AverageRounding`]
/// - `MajorityAbsolute`: one value chosen by more than half of all participants
/// - `MajorityRelative`: one value with strictly more votes than any other
///
/// # Example
///
/// ```
/// use poker_domain::consensus::AgreementMode;
///
/// assert_eq!("strict".parse::<AgreementMode>().ok(), Some(AgreementMode::Unanimity));
/// assert_eq!("majority_abs".parse::<AgreementMode>().ok(), Some(AgreementMode::MajorityAbsolute));
/// assert!(AgreementMode::Unanimity.requires_revote_on_split());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgreementMode {
    /// Every vote must be the same numeric card
    #[default]
    #[serde(alias = "strict", alias = "unanimous")]
    Unanimity,

    /// Median of numeric votes
    Median,

    /// Arithmetic mean of numeric votes
    #[serde(alias = "mean")]
    Average,

    /// More than half of the expected participants chose the same value
    #[serde(alias = "majority_abs")]
    MajorityAbsolute,

    /// Plurality among numeric votes, ties do not agree
    #[serde(alias = "majority_rel")]
    MajorityRelative,
}

impl AgreementMode {
    pub const ALL: [AgreementMode; 5] = [
        AgreementMode::Unanimity,
        AgreementMode::Median,
        AgreementMode::Average,
        AgreementMode::MajorityAbsolute,
        AgreementMode::MajorityRelative,
    ];

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            AgreementMode::Unanimity => "unanimity (everyone plays the same card)",
            AgreementMode::Median => "median of numeric cards",
            AgreementMode::Average => "average of numeric cards",
            AgreementMode::MajorityAbsolute => "absolute majority (more than half of everyone)",
            AgreementMode::MajorityRelative => "relative majority (most played card, no tie)",
        }
    }

    /// Stable identifier used in config files and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementMode::Unanimity => "unanimity",
            AgreementMode::Median => "median",
            AgreementMode::Average => "average",
            AgreementMode::MajorityAbsolute => "majority_absolute",
            AgreementMode::MajorityRelative => "majority_relative",
        }
    }

    /// Whether a split vote can fail to agree and send the story back to voting.
    ///
    /// Median and Average always agree once a numeric card is on the table.
    pub fn requires_revote_on_split(&self) -> bool {
        !matches!(self, AgreementMode::Median | AgreementMode::Average)
    }
}

impl std::fmt::Display for AgreementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgreementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "unanimity" | "unanimous" | "strict" => Ok(AgreementMode::Unanimity),
            "median" => Ok(AgreementMode::Median),
            "average" | "mean" => Ok(AgreementMode::Average),
            "majority_absolute" | "majority_abs" | "absolute" => {
                Ok(AgreementMode::MajorityAbsolute)
            }
            "majority_relative" | "majority_rel" | "relative" | "plurality" => {
                Ok(AgreementMode::MajorityRelative)
            }
            _ => Err(format!(
                "Unknown agreement mode: {}. Valid: unanimity, median, average, majority_absolute, majority_relative",
                s
            )),
        }
    }
}

/// How the Average mode maps a mean that falls between two deck values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AverageRounding {
    /// Nearest numeric card; a midpoint rounds up
    #[default]
    Nearest,
    /// Largest numeric card not above the mean
    Floor,
    /// Report the mean as-is
    Unrounded,
}

impl std::fmt::Display for AverageRounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AverageRounding::Nearest => write!(f, "nearest"),
            AverageRounding::Floor => write!(f, "floor"),
            AverageRounding::Unrounded => write!(f, "unrounded"),
        }
    }
}

impl std::str::FromStr for AverageRounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" | "round" => Ok(AverageRounding::Nearest),
            "floor" | "down" => Ok(AverageRounding::Floor),
            "unrounded" | "none" | "exact" => Ok(AverageRounding::Unrounded),
            _ => Err(format!(
                "Unknown average rounding: {}. Valid: nearest, floor, unrounded",
                s
            )),
        }
    }
}
