//! Participant name value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest display name accepted, in characters.
pub const MAX_NAME_CHARS: usize = 64;

/// A participant's display name, unique within one session (Value Object)
///
/// Names are trimmed; blank or overly long names are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("participant name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_CHARS {
            return Err(DomainError::invalid(format!(
                "participant name longer than {} characters",
                MAX_NAME_CHARS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ParticipantName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParticipantName> for String {
    fn from(name: ParticipantName) -> Self {
        name.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
