//! Report writer trait and output errors

use crate::crawler::PageRecord;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes crawl records into one report format
pub trait ReportWriter {
    /// File extension for this format, without the dot
    fn extension(&self) -> &'static str;

    /// Writes every record, in order, to `out`
    fn write_records(&self, records: &[PageRecord], out: &mut dyn Write) -> OutputResult<()>;
}
