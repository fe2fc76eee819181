//! Server configuration from TOML (`[server]` section)

use poker_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Raw server configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Listen address, `host:port`
    pub bind: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl FileServerConfig {
    /// Parse the bind address, falling back to the default on error.
    pub fn parse_bind(&self) -> (SocketAddr, Option<ConfigIssue>) {
        match self.bind.trim().parse() {
            Ok(addr) => (addr, None),
            Err(_) => (
                SocketAddr::from(([127, 0, 0, 1], 8080)),
                Some(ConfigIssue::error(
                    ConfigIssueCode::InvalidBindAddress,
                    format!("server.bind: '{}' is not a socket address", self.bind),
                )),
            ),
        }
    }
}
