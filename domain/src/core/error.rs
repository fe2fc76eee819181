//! Domain error types

use thiserror::Error;

/// Coarse classification of a [`DomainError`], used by transports to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown session, story or participant
    NotFound,
    /// Rejected before any mutation (bad card, empty story list, unknown mode)
    InvalidInput,
    /// Operation not legal in the current state
    IllegalTransition,
    /// The session has been closed and accepts no further changes
    Closed,
}

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already closed: {0}")]
    SessionAlreadyClosed(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Story not found at index {0}")]
    StoryNotFound(usize),

    #[error("Invalid card: {0}")]
    InvalidCard(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Illegal transition: {0}")]
    IllegalTransition(String),
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::IllegalTransition => "illegal_transition",
            ErrorKind::Closed => "closed",
        }
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::SessionNotFound(_)
            | DomainError::ParticipantNotFound(_)
            | DomainError::StoryNotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidCard(_) | DomainError::InvalidInput(_) => ErrorKind::InvalidInput,
            DomainError::IllegalTransition(_) => ErrorKind::IllegalTransition,
            DomainError::SessionAlreadyClosed(_) => ErrorKind::Closed,
        }
    }

    /// Stable snake_case identifier used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::SessionNotFound(_) => "session_not_found",
            DomainError::SessionAlreadyClosed(_) => "session_already_closed",
            DomainError::ParticipantNotFound(_) => "participant_not_found",
            DomainError::StoryNotFound(_) => "story_not_found",
            DomainError::InvalidCard(_) => "invalid_card",
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::IllegalTransition(_) => "illegal_transition",
        }
    }

    pub(crate) fn illegal(message: impl Into<String>) -> Self {
        DomainError::IllegalTransition(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::SessionNotFound("123456".to_string());
        assert_eq!(error.to_string(), "Session not found: 123456");

        let error = DomainError::StoryNotFound(3);
        assert_eq!(error.to_string(), "Story not found at index 3");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            DomainError::ParticipantNotFound("dana".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DomainError::InvalidCard("7".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            DomainError::illegal("not revealed").kind(),
            ErrorKind::IllegalTransition
        );
        assert_eq!(
            DomainError::SessionAlreadyClosed("123456".into()).kind(),
            ErrorKind::Closed
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(DomainError::StoryNotFound(1).code(), "story_not_found");
        assert_eq!(DomainError::invalid("x").code(), "invalid_input");
    }
}
