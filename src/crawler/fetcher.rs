//! Fetch worker
//!
//! This module handles the single-GET side of the crawl:
//! - Building the HTTP client with timeout and user agent
//! - The [`Transport`] seam between the crawler and the network
//! - Turning one response (or failure) into a [`FetchOutcome`]
//!
//! Failures are values, not errors: the coordinator receives
//! `FetchOutcome::Failed` and drops the URL. Nothing is retried.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::frontier::CrawlTarget;
use crate::url::Category;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a single fetch produced no record
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// What came back from the network for one GET
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// `Content-Type` header value, if any
    pub content_type: Option<String>,
    /// Undecoded body bytes
    pub body: Vec<u8>,
}

/// One fetched resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code (non-2xx included)
    pub status_code: u16,
    /// Body size in bytes
    pub content_length: usize,
    /// Category of the URL that was requested
    pub category: Category,
    /// Breadth-first level the fetch belonged to
    pub level: u32,
    /// Body decoded as text; only used for link extraction and JSON output
    pub body: String,
}

/// Result of a fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered, whatever the status
    Fetched(PageRecord),

    /// Network, timeout or protocol failure
    Failed { url: String, error: FetchError },

    /// Not attempted because the crawl deadline had passed
    Skipped { url: String },
}

/// Where a fetch sits in its batch, for progress lines
#[derive(Debug, Clone, Copy)]
pub struct BatchPosition {
    pub level: u32,
    pub index: usize,
    pub total: usize,
    pub live: bool,
}

/// Performs a single GET
///
/// Implemented by [`HttpTransport`] for real crawls; tests plug in an
/// in-memory site instead.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<RawResponse, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed (reqwest's default limit of 10 hops), so the
/// response URL is the final, redirect-resolved one.
///
/// # Example
///
/// ```no_run
/// use moss::config::{CrawlerConfig, UserAgentConfig};
/// use moss::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(crawler.timeout())
        .connect_timeout(crawler.timeout().min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(crawler, user_agent)?,
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }

        let response = self.client.get(url.clone()).send().await?;
        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(RawResponse {
            final_url,
            status_code,
            content_type,
            body: body.to_vec(),
        })
    }
}

/// Fetches one target and builds its [`PageRecord`]
///
/// `category` is the classification of the requested URL, not of wherever
/// redirects ended up.
pub async fn fetch_page<T: Transport>(
    transport: &T,
    target: &CrawlTarget,
    category: Category,
    position: BatchPosition,
) -> FetchOutcome {
    let response = match transport.get(&target.url).await {
        Ok(response) => response,
        Err(error) => {
            return FetchOutcome::Failed {
                url: target.url.to_string(),
                error,
            }
        }
    };

    let record = PageRecord {
        content_length: response.body.len(),
        body: decode_body(&response.body, response.content_type.as_deref()),
        url: response.final_url,
        status_code: response.status_code,
        category,
        level: target.level,
    };

    report_progress(&record, position);

    FetchOutcome::Fetched(record)
}

/// Decodes a body using the charset named in its `Content-Type`
///
/// Falls back to UTF-8 when no charset is given or the label is unknown.
/// A byte order mark overrides the declared charset.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

fn report_progress(record: &PageRecord, position: BatchPosition) {
    if position.live {
        tracing::info!(
            "[Level {}] [{}/{}] {} [{}] [{}]",
            position.level,
            position.index,
            position.total,
            record.url,
            record.status_code,
            record.category
        );
    } else {
        tracing::debug!(
            "[Level {}] [{}/{}] {} [{}] [{}]",
            position.level,
            position.index,
            position.total,
            record.url,
            record.status_code,
            record.category
        );
    }
}
