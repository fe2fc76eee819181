//! Reconciliation protocol, client side.
//!
//! - [`tracker::ReconciliationTracker`]: decides the next request from a view
//! - [`poller::PollingClient`]: drives a participant on a fixed interval

pub mod poller;
pub mod tracker;

pub use poller::{PollReport, PollingClient, ScriptedVotes, VoteChooser};
pub use tracker::{PollAction, ReconciliationTracker};
