//! JSONL file writer for session events.
//!
//! Each [`SessionEvent`] is serialized as a single JSON line with `type`,
//! `code` and `timestamp` fields, appended to the file via a buffered writer.

use poker_application::{SessionEvent, SessionEventLogger};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL session event logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Appends to an existing file so
/// the trail survives restarts. Flushes on `Drop`.
pub struct JsonlSessionEventLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlSessionEventLogger {
    /// Create a new logger appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create session event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open session event log {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionEventLogger for JsonlSessionEventLogger {
    fn log(&self, event: SessionEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = event.to_record();
        record.insert("timestamp".to_string(), Value::String(timestamp));

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // JSONL is append-only; flush each line so a crash loses nothing
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlSessionEventLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poker_domain::SessionCode;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let logger = JsonlSessionEventLogger::new(&path).unwrap();
        let code = SessionCode::from_number(123456);

        logger.log(SessionEvent::new(
            "participant_joined",
            &code,
            json!({ "participant": "ann" }),
        ));
        logger.log(SessionEvent::new(
            "story_closed",
            &code,
            json!({
                "story_index": 0,
                "round": 1,
                "outcome": { "status": "agreed", "detail": 5.0 },
            }),
        ));

        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line["code"], "123456");
            assert!(line.get("timestamp").is_some());
        }
        assert_eq!(lines[0]["type"], "participant_joined");
        assert_eq!(lines[0]["participant"], "ann");
        assert_eq!(lines[1]["type"], "story_closed");
        assert_eq!(lines[1]["outcome"]["status"], "agreed");
    }

    #[test]
    fn test_jsonl_logger_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.jsonl");
        let code = SessionCode::from_number(1);

        for _ in 0..2 {
            let logger = JsonlSessionEventLogger::new(&path).unwrap();
            logger.log(SessionEvent::new("session_expired", &code, Value::Null));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_jsonl_logger_returns_none_for_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlSessionEventLogger::new(dir.path()).is_none());
    }
}
