//! Application-level errors

use poker_domain::{DomainError, ErrorKind};
use thiserror::Error;

/// Errors returned by the planning poker operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PokerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("No free session code after {0} attempts")]
    CodeSpaceExhausted(usize),

    /// A remote server rejected the request
    #[error("{message}")]
    Remote {
        kind: ErrorKind,
        code: String,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl PokerError {
    /// Domain classification, if the error has one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            PokerError::Domain(e) => Some(e.kind()),
            PokerError::Remote { kind, .. } => Some(*kind),
            PokerError::CodeSpaceExhausted(_) | PokerError::Transport(_) => None,
        }
    }

    /// Stable snake_case identifier used on the wire.
    pub fn code(&self) -> &str {
        match self {
            PokerError::Domain(e) => e.code(),
            PokerError::Remote { code, .. } => code,
            PokerError::CodeSpaceExhausted(_) => "code_space_exhausted",
            PokerError::Transport(_) => "transport",
        }
    }

    /// Worth trying again on the next poll cycle.
    ///
    /// Transport hiccups and transitions that lost a race are transient; a
    /// missing session or a rejected card is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PokerError::Transport(_))
            || self.kind() == Some(ErrorKind::IllegalTransition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_passthrough() {
        let error: PokerError = DomainError::SessionNotFound("123456".into()).into();
        assert_eq!(error.to_string(), "Session not found: 123456");
        assert_eq!(error.kind(), Some(ErrorKind::NotFound));
        assert_eq!(error.code(), "session_not_found");
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_retryable() {
        assert!(PokerError::Transport("connection reset".into()).is_retryable());
        assert!(PokerError::Domain(DomainError::IllegalTransition("x".into())).is_retryable());
        assert!(
            PokerError::Remote {
                kind: ErrorKind::IllegalTransition,
                code: "illegal_transition".into(),
                message: "not revealed".into(),
            }
            .is_retryable()
        );
        assert!(!PokerError::CodeSpaceExhausted(64).is_retryable());
    }
}
