//! Consensus domain
//!
//! Turns the votes of one round into a final estimate, or into a reason why
//! the story has to be re-voted.
//!
//! # Flow
//!
//! ```text
//! votes (participant → card) ──┐
//! expected participants ───────┼──▶ ConsensusEngine::evaluate ──▶ Outcome
//! AgreementMode ───────────────┘         │                         ├─ Agreed(estimate)
//!                                        │                         └─ NotAgreed(reason)
//!                                 AverageRounding
//! ```
//!
//! The engine is pure: the same inputs always give the same outcome, so it is
//! safe to call from any thread without coordination.

pub mod engine;
pub mod mode;
pub mod outcome;

pub use engine::ConsensusEngine;
pub use mode::{AgreementMode, AverageRounding};
pub use outcome::{Estimate, NoAgreementReason, Outcome};
