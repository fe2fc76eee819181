//! HTTP adapters.
//!
//! Provides [`HttpPokerClient`], which implements the
//! [`PlanningPokerPort`](poker_application::PlanningPokerPort) against a
//! remote `planning-poker serve` instance so polling clients can run on
//! other machines.

mod client;

pub use client::HttpPokerClient;
