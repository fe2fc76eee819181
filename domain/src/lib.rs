//! Domain layer for planning-poker
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns and no
//! async code: every operation is a plain synchronous state transition.
//!
//! # Core Concepts
//!
//! ## Deck
//!
//! The fixed card set `0 1 2 3 5 8 13 20 40 100 coffee ?`. Anything else is
//! rejected as an invalid card.
//!
//! ## Consensus
//!
//! A pure [`ConsensusEngine`] turns the votes of one round into an
//! [`Outcome`] according to an [`AgreementMode`].
//!
//! ## Session
//!
//! The [`Session`] aggregate owns stories, participants and the
//! [`VoteLedger`]. Rounds are identified by a [`StoryCursor`] so that
//! closing a story is idempotent under concurrent requests.

pub mod config;
pub mod consensus;
pub mod core;
pub mod deck;
pub mod ledger;
pub mod session;
pub mod story;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    AgreementMode, AverageRounding, ConsensusEngine, Estimate, NoAgreementReason, Outcome,
};
pub use core::{
    code::SessionCode,
    error::{DomainError, ErrorKind},
    participant::ParticipantName,
};
pub use deck::{Card, Deck};
pub use ledger::VoteLedger;
pub use session::{
    CloseReport, CurrentStoryView, Finalization, JoinOutcome, ParticipantView, Session,
    SessionResults, SessionStatus, SessionSummary, SessionView, Story, StoryCursor, StoryStatus,
    StorySummary, VoteReceipt,
};
pub use story::{StoryDraft, parse_story_list};
