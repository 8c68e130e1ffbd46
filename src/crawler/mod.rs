//! Crawler module for page fetching and link discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Transport`] seam
//! - HTML parsing and link extraction
//! - The breadth-first frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlReport, StopReason};
pub use fetcher::{
    build_http_client, decode_body, fetch_page, BatchPosition, FetchError, FetchOutcome,
    HttpTransport, PageRecord, RawResponse, Transport,
};
pub use frontier::{CrawlTarget, Frontier};
pub use parser::{extract_links, parse_html, ParsedPage};

use crate::config::Config;
use crate::MossError;
use url::Url;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Derive the run hostname from the seed
/// 3. Crawl level by level until no new internal URL turns up
///
/// # Arguments
///
/// * `seed` - A validated seed URL (see [`crate::config::validate_seed_url`])
/// * `config` - The crawler configuration
pub async fn crawl(seed: Url, config: &Config) -> Result<CrawlReport, MossError> {
    let coordinator = Coordinator::new(seed, config)?;
    Ok(coordinator.run().await)
}
