//! Port for the structured session audit trail.
//!
//! Defines the [`SessionEventLogger`] trait for recording what happened to a
//! session (joins, votes, reveals, closes) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures session
//! history in a machine-readable format (JSONL). Card values are never part
//! of `vote_submitted`; they only appear once a story is revealed or closed.

use poker_domain::SessionCode;
use serde_json::{Map, Value};

/// A structured session event for logging.
///
/// Each event has a type string, the session it belongs to, and a JSON
/// payload containing event-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    /// Event type identifier (e.g., "session_created", "story_closed").
    pub event_type: &'static str,
    pub code: SessionCode,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SessionEvent {
    pub fn new(event_type: &'static str, code: &SessionCode, payload: Value) -> Self {
        Self {
            event_type,
            code: code.clone(),
            payload,
        }
    }

    /// The payload as a flat JSON object with `type` and `code` merged in.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("type".into(), Value::from(self.event_type));
        record.insert("code".into(), Value::from(self.code.as_str()));
        if let Value::Object(fields) = &self.payload {
            for (key, value) in fields {
                record.insert(key.clone(), value.clone());
            }
        } else if !self.payload.is_null() {
            record.insert("payload".into(), self.payload.clone());
        }
        record
    }
}

/// Port for logging session events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and infallible: a failing audit trail must never fail
/// a vote.
pub trait SessionEventLogger: Send + Sync {
    /// Record a session event.
    fn log(&self, event: SessionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSessionEventLogger;

impl SessionEventLogger for NoSessionEventLogger {
    fn log(&self, _event: SessionEvent) {}
}
