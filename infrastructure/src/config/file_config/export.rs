//! Export configuration from TOML (`[export]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw export configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExportConfig {
    /// Directory receiving `<code>.json` for every finalized session
    pub results_dir: Option<PathBuf>,
}
