//! Presentation layer for planning-poker
//!
//! This crate contains CLI definitions, the HTTP transport and
//! console output formatters.

pub mod cli;
pub mod http;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ServeArgs, SimulateArgs};
pub use http::{ApiError, AppState, poker_router};
pub use output::console::ConsoleFormatter;
