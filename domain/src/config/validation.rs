//! Configuration validation results.
//!
//! Loaders check a merged configuration and report what they find as a list
//! of [`ConfigIssue`]s instead of failing on the first problem. Callers print
//! warnings and refuse to start on errors.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: works, but probably not as intended.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `server.bind` is not a socket address.
    InvalidBindAddress,
    /// An interval or TTL is zero.
    ZeroDuration,
    /// `session.default_mode` names no agreement mode.
    UnknownAgreementMode,
    /// `session.average_rounding` names no rounding policy.
    UnknownRounding,
    /// Archived sessions expire before idle live ones.
    ArchiveShorterThanIdle,
    /// Sweeps run less often than sessions expire.
    SweepSlowerThanTtl,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// True if any issue is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(ConfigIssue::is_error)
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_ignores_warnings() {
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::ArchiveShorterThanIdle,
            "archive ttl shorter than idle ttl",
        )];
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_detects_error() {
        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::SweepSlowerThanTtl, "slow sweep"),
            ConfigIssue::error(ConfigIssueCode::ZeroDuration, "polling.interval_ms is 0"),
        ];
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn display_prefixes_severity() {
        let issue = ConfigIssue::error(ConfigIssueCode::InvalidBindAddress, "bad bind");
        assert_eq!(issue.to_string(), "error: bad bind");
    }
}
