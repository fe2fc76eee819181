//! Configuration file loading for planning-poker
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `POKER_*` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./poker.toml` or `./.poker.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/planning-poker/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileExportConfig, FileLoggingConfig, FilePollingConfig, FileServerConfig,
    FileSessionConfig,
};
pub use loader::ConfigLoader;
