//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL session audit trail; disabled when unset
    pub event_log: Option<PathBuf>,
    /// Daily-rotated diagnostic log file; stderr only when unset
    pub log_file: Option<PathBuf>,
}
