use crate::config::app::AppInfo;
use crate::output::OutputFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Moss
///
/// Every section is optional; a missing file or section means defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    /// Extra domains treated as SOCIAL on top of the built-in list
    pub social: Vec<DomainEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// Maximum number of fetches in flight at once
    pub concurrency: u32,

    /// Stop after this many breadth-first levels
    #[serde(rename = "max-levels")]
    pub max_levels: Option<u32>,

    /// Stop dispatching fetches after this many
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,

    /// Wall-clock budget for the whole crawl (seconds)
    #[serde(rename = "max-duration")]
    pub max_duration: Option<u64>,

    /// Emit a progress line for every fetch
    pub live: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout: 5,
            concurrency: 16,
            max_levels: None,
            max_pages: None,
            max_duration: None,
            live: false,
        }
    }
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration.map(Duration::from_secs)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: AppInfo::NAME.to_string(),
            crawler_version: AppInfo::VERSION.to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,

    /// Directory the report is written into (current directory if unset)
    pub directory: Option<PathBuf>,

    /// Include fetched bodies in JSON reports
    #[serde(rename = "include-body")]
    pub include_body: bool,
}

/// Simple domain entry for the SOCIAL allowlist
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    /// Domain pattern (e.g., "mastodon.social" or "*.mastodon.social")
    pub domain: String,
}
