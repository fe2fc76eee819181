//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like values stay strings here so a typo is reported by
//! [`FileConfig::validate`] instead of aborting deserialization.

mod export;
mod logging;
mod polling;
mod server;
mod session;

pub use export::FileExportConfig;
pub use logging::FileLoggingConfig;
pub use polling::FilePollingConfig;
pub use server::FileServerConfig;
pub use session::FileSessionConfig;

use poker_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener
    pub server: FileServerConfig,
    /// Session defaults and lifetimes
    pub session: FileSessionConfig,
    /// Client polling cadence
    pub polling: FilePollingConfig,
    /// Audit trail and log file
    pub logging: FileLoggingConfig,
    /// Where finalized results are written
    pub export: FileExportConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. The bind address parses
    /// 2. Agreement mode and rounding names are known
    /// 3. No interval or TTL is zero
    /// 4. TTLs and sweep interval are consistent with each other
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Listener
        issues.extend(self.server.parse_bind().1);

        // 2. Enum parse validation
        issues.extend(self.session.parse_default_mode().1);
        issues.extend(self.session.parse_average_rounding().1);

        // 3. Zero durations
        let durations = [
            ("session.idle_ttl_secs", self.session.idle_ttl_secs),
            ("session.archive_ttl_secs", self.session.archive_ttl_secs),
            ("session.sweep_interval_secs", self.session.sweep_interval_secs),
            ("polling.interval_ms", self.polling.interval_ms),
        ];
        for (field, value) in durations {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroDuration,
                    format!("{} cannot be 0", field),
                ));
            }
        }

        // 4. Consistency
        if self.session.archive_ttl_secs < self.session.idle_ttl_secs {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ArchiveShorterThanIdle,
                format!(
                    "session.archive_ttl_secs ({}) is shorter than session.idle_ttl_secs ({}); finished sessions vanish before idle ones",
                    self.session.archive_ttl_secs, self.session.idle_ttl_secs
                ),
            ));
        }
        if self.session.sweep_interval_secs > self.session.idle_ttl_secs
            && self.session.idle_ttl_secs > 0
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::SweepSlowerThanTtl,
                format!(
                    "session.sweep_interval_secs ({}) exceeds session.idle_ttl_secs ({}); idle sessions outlive their TTL",
                    self.session.sweep_interval_secs, self.session.idle_ttl_secs
                ),
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poker_domain::{AgreementMode, AverageRounding, Severity};
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
bind = "0.0.0.0:9000"

[session]
default_mode = "majority_relative"
average_rounding = "floor"
idle_ttl_secs = 600
archive_ttl_secs = 3600
sweep_interval_secs = 30

[polling]
interval_ms = 500

[logging]
event_log = "/var/log/poker/events.jsonl"

[export]
results_dir = "results"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(
            config.session.parse_default_mode().0,
            AgreementMode::MajorityRelative
        );
        assert_eq!(
            config.session.parse_average_rounding().0,
            AverageRounding::Floor
        );
        assert_eq!(config.polling.interval_ms, 500);
        assert_eq!(
            config.logging.event_log,
            Some(PathBuf::from("/var/log/poker/events.jsonl"))
        );
        assert_eq!(config.export.results_dir, Some(PathBuf::from("results")));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[session]
default_mode = "average"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.parse_default_mode().0, AgreementMode::Average);
        // Defaults should apply
        assert_eq!(config.server, FileServerConfig::default());
        assert_eq!(config.polling.interval_ms, 2000);
        assert!(config.logging.event_log.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[server]
bind = "not an address"

[session]
default_mode = "loudest"
average_rounding = "ceiling"

[polling]
interval_ms = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::InvalidBindAddress));
        assert!(codes.contains(&ConfigIssueCode::UnknownAgreementMode));
        assert!(codes.contains(&ConfigIssueCode::UnknownRounding));
        assert!(codes.contains(&ConfigIssueCode::ZeroDuration));
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_validate_warns_on_short_archive() {
        let mut config = FileConfig::default();
        config.session.archive_ttl_secs = 10;

        let issues = config.validate();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].code, ConfigIssueCode::ArchiveShorterThanIdle);
    }
}
