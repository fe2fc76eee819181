//! Session configuration from TOML (`[session]` section)

use poker_application::RegistryConfig;
use poker_domain::{AgreementMode, AverageRounding, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw session configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Agreement mode for sessions created without one
    pub default_mode: String,
    /// `nearest`, `floor` or `unrounded`
    pub average_rounding: String,
    pub idle_ttl_secs: u64,
    pub archive_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        let registry = RegistryConfig::default();
        Self {
            default_mode: registry.default_mode.as_str().to_string(),
            average_rounding: registry.rounding.to_string(),
            idle_ttl_secs: registry.idle_ttl.as_secs(),
            archive_ttl_secs: registry.archive_ttl.as_secs(),
            sweep_interval_secs: registry.sweep_interval.as_secs(),
        }
    }
}

impl FileSessionConfig {
    pub fn parse_default_mode(&self) -> (AgreementMode, Option<ConfigIssue>) {
        match self.default_mode.parse::<AgreementMode>() {
            Ok(mode) => (mode, None),
            Err(_) => (
                AgreementMode::default(),
                Some(ConfigIssue::error(
                    ConfigIssueCode::UnknownAgreementMode,
                    format!(
                        "session.default_mode: unknown value '{}' (expected one of: {})",
                        self.default_mode,
                        AgreementMode::ALL
                            .iter()
                            .map(AgreementMode::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )),
            ),
        }
    }

    pub fn parse_average_rounding(&self) -> (AverageRounding, Option<ConfigIssue>) {
        match self.average_rounding.parse::<AverageRounding>() {
            Ok(rounding) => (rounding, None),
            Err(_) => (
                AverageRounding::default(),
                Some(ConfigIssue::error(
                    ConfigIssueCode::UnknownRounding,
                    format!(
                        "session.average_rounding: unknown value '{}' (expected nearest, floor or unrounded)",
                        self.average_rounding
                    ),
                )),
            ),
        }
    }

    /// Application-level registry settings. Invalid values fall back to
    /// defaults; [`validate`](super::FileConfig::validate) reports them.
    pub fn to_registry_config(&self) -> RegistryConfig {
        let defaults = RegistryConfig::default();
        let secs = |value: u64, fallback: Duration| {
            if value == 0 {
                fallback
            } else {
                Duration::from_secs(value)
            }
        };

        RegistryConfig::default()
            .with_default_mode(self.parse_default_mode().0)
            .with_rounding(self.parse_average_rounding().0)
            .with_idle_ttl(secs(self.idle_ttl_secs, defaults.idle_ttl))
            .with_archive_ttl(secs(self.archive_ttl_secs, defaults.archive_ttl))
            .with_sweep_interval(secs(self.sweep_interval_secs, defaults.sweep_interval))
    }
}
