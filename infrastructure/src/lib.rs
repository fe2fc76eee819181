//! Infrastructure layer for planning-poker
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod export;
#[cfg(feature = "http-client")]
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileExportConfig, FileLoggingConfig, FilePollingConfig,
    FileServerConfig, FileSessionConfig,
};
pub use export::JsonResultsExporter;
#[cfg(feature = "http-client")]
pub use http::HttpPokerClient;
pub use logging::JsonlSessionEventLogger;
