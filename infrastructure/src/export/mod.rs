//! Results export adapters.
//!
//! Provides [`JsonResultsExporter`], which implements the
//! [`ResultsExporter`](poker_application::ResultsExporter) port by writing
//! one pretty-printed JSON document per finalized session.

mod json_exporter;

pub use json_exporter::JsonResultsExporter;
