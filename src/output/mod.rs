//! Output module for writing crawl reports
//!
//! This module handles:
//! - Serializing crawl records to CSV or JSON
//! - Naming and placing the report file
//! - Summarizing a finished crawl on the console

mod csv_output;
mod json_output;
pub mod stats;
mod traits;

pub use csv_output::{CsvReport, CSV_HEADER};
pub use json_output::JsonReport;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReportWriter};

use crate::config::OutputConfig;
use crate::crawler::CrawlReport;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Report file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// The writer for this format
    pub fn writer(&self, include_body: bool) -> Box<dyn ReportWriter> {
        match self {
            OutputFormat::Csv => Box::new(CsvReport),
            OutputFormat::Json => Box::new(JsonReport { include_body }),
        }
    }
}

/// Report file name for a crawl of `hostname`
///
/// Characters that are awkward in file names (IPv6 brackets and colons)
/// become underscores.
///
/// # Example
///
/// ```
/// use moss::output::report_file_name;
///
/// assert_eq!(report_file_name("example.com", "csv"), "moss_result_example.com.csv");
/// ```
pub fn report_file_name(hostname: &str, extension: &str) -> String {
    let safe_host: String = hostname
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("moss_result_{}.{}", safe_host, extension)
}

/// Writes the crawl report and returns where it went
///
/// The output directory (current directory if unset) is created if needed.
pub fn write_report(report: &CrawlReport, config: &OutputConfig) -> OutputResult<PathBuf> {
    let directory = match &config.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let writer = config.format.writer(config.include_body);
    write_report_with(report, writer.as_ref(), &directory)
}

/// Writes the crawl report into `directory` with an explicit writer
pub fn write_report_with(
    report: &CrawlReport,
    writer: &dyn ReportWriter,
    directory: &Path,
) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(directory)?;

    let path = directory.join(report_file_name(&report.hostname, writer.extension()));
    let mut out = BufWriter::new(File::create(&path)?);
    writer.write_records(&report.records, &mut out)?;
    out.flush()?;

    tracing::debug!("Wrote {} records to {}", report.records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{PageRecord, StopReason};
    use crate::url::Category;
    use chrono::Utc;

    fn report() -> CrawlReport {
        CrawlReport {
            seed: url::Url::parse("http://a.test/").unwrap(),
            hostname: "a.test".to_string(),
            records: vec![PageRecord {
                url: "http://a.test/".to_string(),
                status_code: 200,
                content_length: 5,
                category: Category::Internal,
                level: 1,
                body: "hello".to_string(),
            }],
            levels: 1,
            stop_reason: StopReason::Exhausted,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_file_name_sanitizes_host() {
        assert_eq!(report_file_name("[::1]", "json"), "moss_result____1_.json");
    }

    #[test]
    fn test_write_csv_into_new_directory() {
        let temp = tempfile::tempdir().unwrap();
        let directory = temp.path().join("nested").join("reports");
        let config = OutputConfig {
            format: OutputFormat::Csv,
            directory: Some(directory.clone()),
            include_body: false,
        };

        let path = write_report(&report(), &config).unwrap();

        assert_eq!(path, directory.join("moss_result_a.test.csv"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("url,status_code,content_length,type\n"));
        assert!(content.contains("http://a.test/,200,5,INTERNAL"));
    }

    #[test]
    fn test_write_json_with_body() {
        let temp = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            format: OutputFormat::Json,
            directory: Some(temp.path().to_path_buf()),
            include_body: true,
        };

        let path = write_report(&report(), &config).unwrap();

        assert_eq!(path.file_name().unwrap(), "moss_result_a.test.json");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value[0]["body"], "hello");
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = write_report_with(&report(), &CsvReport, &blocker.join("sub"));
        assert!(matches!(result, Err(OutputError::Io(_))));
    }
}
