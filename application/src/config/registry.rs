//! Registry parameters: session defaults and lifetimes.

use poker_domain::{AgreementMode, AverageRounding};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How sessions are created, kept and expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Mode used when `CreateSession` does not name one.
    pub default_mode: AgreementMode,
    /// How an Average that falls between cards is reported.
    pub rounding: AverageRounding,
    /// Live sessions untouched for this long are swept.
    pub idle_ttl: Duration,
    /// Finalized sessions stay readable for this long.
    pub archive_ttl: Duration,
    /// Period of the background sweep.
    pub sweep_interval: Duration,
    /// Random draws tried before giving up on finding a free code.
    pub code_attempts: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_mode: AgreementMode::default(),
            rounding: AverageRounding::default(),
            idle_ttl: Duration::from_secs(2 * 60 * 60),
            archive_ttl: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(60),
            code_attempts: 64,
        }
    }
}

impl RegistryConfig {
    // ==================== Builder Methods ====================

    pub fn with_default_mode(mut self, mode: AgreementMode) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_rounding(mut self, rounding: AverageRounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn with_archive_ttl(mut self, ttl: Duration) -> Self {
        self.archive_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_code_attempts(mut self, attempts: usize) -> Self {
        self.code_attempts = attempts.max(1);
        self
    }
}
