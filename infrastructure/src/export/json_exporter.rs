//! JSON file exporter for finalized session results.

use async_trait::async_trait;
use poker_application::{ExportError, ResultsExporter};
use poker_domain::SessionResults;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `<dir>/<code>.json` for every finalized session.
pub struct JsonResultsExporter {
    dir: PathBuf,
}

impl JsonResultsExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the results of `code` end up.
    pub fn path_for(&self, results: &SessionResults) -> PathBuf {
        self.dir.join(format!("{}.json", results.code))
    }
}

#[async_trait]
impl ResultsExporter for JsonResultsExporter {
    async fn export(&self, results: &SessionResults) -> Result<String, ExportError> {
        let json = serde_json::to_string_pretty(results)
            .map_err(|e| ExportError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(results);
        tokio::fs::write(&path, json).await?;

        debug!("Wrote {}", path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poker_domain::{
        AgreementMode, Estimate, SessionCode, SessionStatus, StoryStatus, StorySummary,
    };

    fn results() -> SessionResults {
        SessionResults {
            code: SessionCode::from_number(424242),
            title: "Sprint 12".into(),
            mode: AgreementMode::Average,
            status: SessionStatus::Closed,
            complete: true,
            stories: vec![StorySummary {
                index: 0,
                title: "Login".into(),
                status: StoryStatus::Closed,
                final_value: Some(Estimate::from(8)),
            }],
        }
    }

    #[tokio::test]
    async fn test_export_writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JsonResultsExporter::new(dir.path().join("results"));

        let location = exporter.export(&results()).await.unwrap();

        assert!(location.ends_with("424242.json"));
        let written = std::fs::read_to_string(&location).unwrap();
        let parsed: SessionResults = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, results());
    }

    #[tokio::test]
    async fn test_export_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JsonResultsExporter::new(dir.path());
        let mut first = results();
        first.title = "Draft".into();

        exporter.export(&first).await.unwrap();
        exporter.export(&results()).await.unwrap();

        let written = std::fs::read_to_string(exporter.path_for(&results())).unwrap();
        assert!(written.contains("Sprint 12"));
        assert!(!written.contains("Draft"));
    }
}
