//! Statistics for a finished crawl
//!
//! Summarizes a [`CrawlReport`] for the closing console output.

use crate::config::AppInfo;
use crate::crawler::{CrawlReport, StopReason};
use crate::url::Category;
use std::collections::{BTreeMap, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of records collected
    pub total_urls: usize,

    /// Count of records by category
    pub by_category: BTreeMap<Category, usize>,

    /// Number of unique hosts among the records
    pub unique_hosts: usize,

    /// Records with a non-2xx status
    pub error_statuses: usize,

    /// Breadth-first levels processed
    pub levels: u32,

    /// Wall-clock duration in seconds
    pub duration_seconds: f64,

    pub stop_reason: StopReason,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut by_category = BTreeMap::new();
        let mut hosts = HashSet::new();
        let mut error_statuses = 0;

        for record in &report.records {
            *by_category.entry(record.category).or_insert(0) += 1;

            if let Some(host) = url::Url::parse(&record.url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
            {
                hosts.insert(host);
            }

            if !(200..300).contains(&record.status_code) {
                error_statuses += 1;
            }
        }

        Self {
            total_urls: report.records.len(),
            by_category,
            unique_hosts: hosts.len(),
            error_statuses,
            levels: report.levels,
            duration_seconds: report.duration_seconds(),
            stop_reason: report.stop_reason,
        }
    }

    /// Count for one category (zero if absent)
    pub fn count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics, app: &AppInfo) {
    println!();
    println!("[*] {} v{} crawl finished", app.name, app.version);
    println!("    Total URLs scanned: {}", stats.total_urls);
    println!("    Levels: {}", stats.levels);
    println!("    Unique hosts: {}", stats.unique_hosts);
    println!("    Non-2xx responses: {}", stats.error_statuses);
    println!("    Time taken: {:.2} seconds", stats.duration_seconds);
    if stats.stop_reason != StopReason::Exhausted {
        println!("    Stopped early: {:?}", stats.stop_reason);
    }
    println!();

    println!("URLs by Type:");
    // Sort by count (descending), ties in category order
    let mut counts: Vec<_> = stats.by_category.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (category, count) in counts {
        let percentage = if stats.total_urls > 0 {
            (*count as f64 / stats.total_urls as f64) * 100.0
        } else {
            0.0
        };
        println!("  {:<10} {} ({:.1}%)", category.as_str(), count, percentage);
    }
    println!();
}
