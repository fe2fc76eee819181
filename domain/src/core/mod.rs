//! Core domain concepts shared across all subdomains.
//!
//! - [`code::SessionCode`]: six-digit shareable session identifier
//! - [`participant::ParticipantName`]: a voter's display name
//! - [`error::DomainError`]: domain-level errors

pub mod code;
pub mod error;
pub mod participant;
