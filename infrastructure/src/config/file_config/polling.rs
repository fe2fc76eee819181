//! Polling configuration from TOML (`[polling]` section)

use poker_application::PollingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw polling configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollingConfig {
    /// Milliseconds between two polls of a client
    pub interval_ms: u64,
}

impl Default for FilePollingConfig {
    fn default() -> Self {
        Self { interval_ms: 2000 }
    }
}

impl FilePollingConfig {
    pub fn to_polling_config(&self) -> PollingConfig {
        let config = PollingConfig::default();
        if self.interval_ms == 0 {
            return config;
        }
        config.with_interval(Duration::from_millis(self.interval_ms))
    }
}
