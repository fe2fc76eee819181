//! Consensus outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// An agreed estimate
///
/// Usually a deck value, but Median of an even count and unrounded Average
/// can produce values between cards (e.g. `6.5`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Estimate(f64);

impl Estimate {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<u16> for Estimate {
    fn from(card: u16) -> Self {
        Self(f64::from(card))
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Why a set of votes did not produce a final value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoAgreementReason {
    /// Not every expected participant has voted
    Incomplete,
    /// Nobody voted
    NoVotes,
    /// Only special cards were played
    NoNumericVotes,
    /// A special card blocked a unanimous decision
    SpecialCard,
    /// Votes differ
    Disagreement,
    /// No value reached more than half of the participants
    NoMajority,
    /// Two or more values share the highest count
    Tie,
}

impl NoAgreementReason {
    pub fn description(&self) -> &'static str {
        match self {
            NoAgreementReason::Incomplete => "not everyone has voted",
            NoAgreementReason::NoVotes => "no votes were cast",
            NoAgreementReason::NoNumericVotes => "only special cards were played",
            NoAgreementReason::SpecialCard => "a special card was played",
            NoAgreementReason::Disagreement => "votes differ",
            NoAgreementReason::NoMajority => "no value has an absolute majority",
            NoAgreementReason::Tie => "top values are tied",
        }
    }
}

impl fmt::Display for NoAgreementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of evaluating one round of votes
///
/// # Example
///
/// ```
/// use poker_domain::consensus::{Estimate, NoAgreementReason, Outcome};
///
/// let agreed = Outcome::Agreed(Estimate::from(5));
/// assert_eq!(agreed.value(), Some(Estimate::from(5)));
///
/// let tie = Outcome::NotAgreed(NoAgreementReason::Tie);
/// assert!(!tie.is_agreed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Agreed(Estimate),
    NotAgreed(NoAgreementReason),
}

impl Outcome {
    pub fn is_agreed(&self) -> bool {
        matches!(self, Outcome::Agreed(_))
    }

    pub fn value(&self) -> Option<Estimate> {
        match self {
            Outcome::Agreed(value) => Some(*value),
            Outcome::NotAgreed(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Agreed(value) => write!(f, "Agreed: {}", value),
            Outcome::NotAgreed(reason) => write!(f, "No agreement: {}", reason),
        }
    }
}
