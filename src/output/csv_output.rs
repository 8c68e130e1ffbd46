use crate::crawler::PageRecord;
use crate::output::traits::{OutputResult, ReportWriter};
use crate::url::Category;
use serde::Serialize;
use std::io::Write;

/// Header written at the top of every CSV report
pub const CSV_HEADER: [&str; 4] = ["url", "status_code", "content_length", "type"];

/// CSV report: one row per record, bodies never included
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReport;

#[derive(Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    status_code: u16,
    content_length: usize,
    #[serde(rename = "type")]
    category: Category,
}

impl ReportWriter for CsvReport {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write_records(&self, records: &[PageRecord], out: &mut dyn Write) -> OutputResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        // Written explicitly so an empty crawl still gets a header
        writer.write_record(CSV_HEADER)?;
        for record in records {
            writer.serialize(CsvRow {
                url: &record.url,
                status_code: record.status_code,
                content_length: record.content_length,
                category: record.category,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}
