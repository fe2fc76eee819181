//! Session code value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digits in a session code.
pub const CODE_LENGTH: usize = 6;

/// Exclusive upper bound of the numeric code space (`000000`..=`999999`).
pub const CODE_SPACE: u32 = 1_000_000;

/// A human-shareable six-digit session code (Value Object)
///
/// # Example
///
/// ```
/// use poker_domain::SessionCode;
///
/// let code = SessionCode::from_number(42);
/// assert_eq!(code.as_str(), "000042");
/// assert_eq!("000042".parse::<SessionCode>().unwrap(), code);
/// assert!("42".parse::<SessionCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Build a code from a number; values beyond the code space wrap around.
    pub fn from_number(n: u32) -> Self {
        Self(format!("{:06}", n % CODE_SPACE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SessionCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != CODE_LENGTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid(format!(
                "session code must be {} digits, got '{}'",
                CODE_LENGTH, s
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for SessionCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number_pads() {
        assert_eq!(SessionCode::from_number(7).as_str(), "000007");
        assert_eq!(SessionCode::from_number(999_999).as_str(), "999999");
        assert_eq!(SessionCode::from_number(1_000_001).as_str(), "000001");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("12345".parse::<SessionCode>().is_err());
        assert!("1234567".parse::<SessionCode>().is_err());
        assert!("12a456".parse::<SessionCode>().is_err());
        assert!(" 123456 ".parse::<SessionCode>().is_ok());
    }

    #[test]
    fn test_serde_as_string() {
        let code = SessionCode::from_number(123);
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"000123\"");
        let back: SessionCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<SessionCode>("\"abc\"").is_err());
    }
}
