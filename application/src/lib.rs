//! Application layer for planning-poker
//!
//! This crate contains use cases, port definitions, the session registry and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod reconciliation;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PollingConfig, RegistryConfig};
pub use error::PokerError;
pub use ports::{
    poker_port::PlanningPokerPort,
    results_exporter::{ExportError, NoResultsExporter, ResultsExporter},
    session_event_logger::{NoSessionEventLogger, SessionEvent, SessionEventLogger},
};
pub use reconciliation::{
    PollAction, PollReport, PollingClient, ReconciliationTracker, ScriptedVotes, VoteChooser,
};
pub use registry::{SessionRegistry, SessionSlot, SweepReport};
pub use use_cases::planning_poker::{CreateSessionInput, PlanningPokerService};
pub use use_cases::sweep_sessions::SweepSessionsUseCase;
