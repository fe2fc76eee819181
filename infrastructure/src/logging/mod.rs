//! Logging infrastructure: structured session event logging.
//!
//! Provides [`JsonlSessionEventLogger`], a JSONL file writer that implements
//! the [`SessionEventLogger`](poker_application::SessionEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSessionEventLogger;
