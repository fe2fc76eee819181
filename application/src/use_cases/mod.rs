//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod planning_poker;
pub mod sweep_sessions;
