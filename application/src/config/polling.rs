//! Polling parameters: client loop cadence.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cadence of a [`PollingClient`](crate::reconciliation::PollingClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Time between two polls.
    pub interval: Duration,
    /// Stop after this many polls even if the session is not finalized.
    pub max_polls: Option<usize>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: None,
        }
    }
}

impl PollingConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max: usize) -> Self {
        self.max_polls = Some(max);
        self
    }
}
