//! Results exporter port
//!
//! Once a session is finalized its results are handed to a
//! [`ResultsExporter`], the outbound persistence of
//! `{session, stories-with-final-values}`.

use async_trait::async_trait;
use poker_domain::SessionResults;
use thiserror::Error;

/// Errors that can occur while exporting results
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Where finalized results end up
#[async_trait]
pub trait ResultsExporter: Send + Sync {
    /// Persist the results; returns a human-readable location.
    async fn export(&self, results: &SessionResults) -> Result<String, ExportError>;
}

/// Exporter that keeps nothing
pub struct NoResultsExporter;

#[async_trait]
impl ResultsExporter for NoResultsExporter {
    async fn export(&self, _results: &SessionResults) -> Result<String, ExportError> {
        Ok(String::new())
    }
}
