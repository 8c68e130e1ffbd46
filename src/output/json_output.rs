use crate::crawler::PageRecord;
use crate::output::traits::{OutputResult, ReportWriter};
use crate::url::Category;
use serde::Serialize;
use std::io::Write;

/// JSON report: a pretty-printed array of record objects
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReport {
    /// Add each record's decoded body under `body`
    pub include_body: bool,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    url: &'a str,
    status_code: u16,
    content_length: usize,
    #[serde(rename = "type")]
    category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
}

impl ReportWriter for JsonReport {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write_records(&self, records: &[PageRecord], out: &mut dyn Write) -> OutputResult<()> {
        let rows: Vec<JsonRow<'_>> = records
            .iter()
            .map(|record| JsonRow {
                url: &record.url,
                status_code: record.status_code,
                content_length: record.content_length,
                category: record.category,
                body: self.include_body.then_some(record.body.as_str()),
            })
            .collect();

        serde_json::to_writer_pretty(&mut *out, &rows)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn records() -> Vec<PageRecord> {
        vec![PageRecord {
            url: "https://a.test/".to_string(),
            status_code: 200,
            content_length: 13,
            category: Category::Internal,
            level: 1,
            body: "<p>hello</p>".to_string(),
        }]
    }

    fn render(report: JsonReport) -> Value {
        let mut buffer = Vec::new();
        report.write_records(&records(), &mut buffer).unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    #[test]
    fn test_fields_without_body() {
        let value = render(JsonReport::default());
        let row = &value[0];

        assert_eq!(row["url"], "https://a.test/");
        assert_eq!(row["status_code"], 200);
        assert_eq!(row["content_length"], 13);
        assert_eq!(row["type"], "INTERNAL");
        assert!(row.get("body").is_none());
    }

    #[test]
    fn test_body_toggle() {
        let value = render(JsonReport { include_body: true });
        assert_eq!(value[0]["body"], "<p>hello</p>");
    }

    #[test]
    fn test_empty_array() {
        let mut buffer = Vec::new();
        JsonReport::default().write_records(&[], &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().trim(), "[]");
    }
}
