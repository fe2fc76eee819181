//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod poker_port;
pub mod results_exporter;
pub mod session_event_logger;
