//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop:
//! - Fetching every URL of the current level
//! - Extracting, resolving and classifying links from those pages
//! - Queueing INTERNAL links for the next level
//! - Fetching everything else once, without following its links
//!
//! Each level is a barrier: link extraction only starts once every fetch
//! of the level has completed.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{
    fetch_page, BatchPosition, FetchOutcome, HttpTransport, PageRecord, Transport,
};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::parser::parse_html;
use crate::url::{normalize_url, resolve_link, Classifier};
use crate::MossError;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::time::Instant;
use url::Url;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No new internal URL was discovered
    Exhausted,
    /// `max-levels` was reached with URLs still queued
    MaxLevels,
    /// `max-pages` fetches were dispatched
    MaxPages,
    /// `max-duration` elapsed
    Deadline,
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Seed URL as given
    pub seed: Url,
    /// Hostname all INTERNAL decisions were made against
    pub hostname: String,
    /// Fetched records in collection order
    pub records: Vec<PageRecord>,
    /// Number of levels processed
    pub levels: u32,
    pub stop_reason: StopReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<T: Transport = HttpTransport> {
    seed: Url,
    canonical_seed: Url,
    classifier: Classifier,
    transport: T,
    settings: CrawlerConfig,
    /// Keep decoded bodies on records for the report
    keep_bodies: bool,
}

impl Coordinator<HttpTransport> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Example
    ///
    /// ```no_run
    /// use moss::config::{validate_seed_url, Config};
    /// use moss::crawler::Coordinator;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let seed = validate_seed_url("https://example.com/")?;
    /// let report = Coordinator::new(seed, &Config::default())?.run().await;
    /// println!("{} URLs", report.records.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(seed: Url, config: &Config) -> Result<Self, MossError> {
        let transport = HttpTransport::new(&config.crawler, &config.user_agent)?;
        Self::with_transport(seed, config, transport)
    }
}

impl<T: Transport> Coordinator<T> {
    /// Creates a coordinator around any [`Transport`]
    pub fn with_transport(seed: Url, config: &Config, transport: T) -> Result<Self, MossError> {
        let classifier = Classifier::for_seed(&seed)?
            .with_social_domains(config.social.iter().map(|entry| entry.domain.clone()));
        let canonical_seed = normalize_url(seed.as_str())?;

        Ok(Self {
            seed,
            canonical_seed,
            classifier,
            transport,
            settings: config.crawler.clone(),
            keep_bodies: config.output.include_body,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Runs the crawl to completion (or until a safety valve trips)
    ///
    /// Per level:
    /// 1. Fetch every queued URL
    /// 2. Extract links from the fetched bodies; resolve and classify them
    /// 3. Queue unseen INTERNAL links for the next level; fetch every other
    ///    unseen link right away, once, without expanding it
    /// 4. Move to the next level
    ///
    /// Per-URL failures never abort the loop; they are logged and dropped.
    pub async fn run(&self) -> CrawlReport {
        let started_at = Utc::now();
        let clock = Instant::now();
        let deadline = self.settings.max_duration().map(|budget| clock + budget);

        tracing::info!(
            "Starting crawl of {} (hostname: {})",
            self.seed,
            self.classifier.hostname()
        );

        let mut frontier = Frontier::new(self.seed.clone(), self.canonical_seed.clone());
        let mut records: Vec<PageRecord> = Vec::new();
        let mut dispatched = 0usize;
        let mut levels = 0;
        let mut stop_reason = StopReason::Exhausted;

        while !frontier.is_empty() {
            let level = frontier.level();
            levels = level;

            let (targets, capped) = self.within_page_budget(frontier.take_level(), &mut dispatched);
            let mut pages = self.fetch_batch(level, targets, deadline).await;

            let links = discover_links(&pages);
            self.release_bodies(&mut pages);
            records.extend(pages);

            let mut new_links = 0;
            let mut one_shot = Vec::new();
            for link in links {
                if self.classifier.classify_url(&link).is_internal() {
                    if frontier.schedule(link) {
                        new_links += 1;
                    }
                } else if let Some(target) = frontier.claim(link) {
                    one_shot.push(target);
                    new_links += 1;
                }
            }

            let (one_shot, capped_one_shot) = self.within_page_budget(one_shot, &mut dispatched);
            let mut fetched = self.fetch_batch(level, one_shot, deadline).await;
            self.release_bodies(&mut fetched);
            records.extend(fetched);

            tracing::info!(
                "Level {} | Scanned: {} | New Links: {} | Queue: {}",
                level,
                records.len(),
                new_links,
                frontier.pending()
            );

            if deadline.is_some_and(|d| Instant::now() >= d) {
                stop_reason = StopReason::Deadline;
                break;
            }
            if capped
                || capped_one_shot
                || (self.page_budget_spent(dispatched) && frontier.pending() > 0)
            {
                stop_reason = StopReason::MaxPages;
                break;
            }
            if self.settings.max_levels.is_some_and(|max| level >= max) && frontier.pending() > 0 {
                stop_reason = StopReason::MaxLevels;
                break;
            }

            frontier.advance();
        }

        if stop_reason != StopReason::Exhausted {
            tracing::warn!(
                "Crawl stopped early ({:?}) with {} URLs still queued",
                stop_reason,
                frontier.pending()
            );
        }

        tracing::info!(
            "Crawl completed: {} URLs recorded over {} levels in {:?}",
            records.len(),
            levels,
            clock.elapsed()
        );

        CrawlReport {
            seed: self.seed.clone(),
            hostname: self.classifier.hostname().to_string(),
            records,
            levels,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Fetches a batch with bounded concurrency, keeping queue order
    async fn fetch_batch(
        &self,
        level: u32,
        targets: Vec<CrawlTarget>,
        deadline: Option<Instant>,
    ) -> Vec<PageRecord> {
        let total = targets.len();
        let live = self.settings.live;
        let concurrency = self.settings.concurrency.max(1) as usize;

        let outcomes: Vec<FetchOutcome> = stream::iter(targets.into_iter().enumerate())
            .map(|(i, target)| {
                let category = self.classifier.classify_url(&target.url);
                let position = BatchPosition {
                    level,
                    index: i + 1,
                    total,
                    live,
                };
                async move {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        return FetchOutcome::Skipped {
                            url: target.url.to_string(),
                        };
                    }
                    fetch_page(&self.transport, &target, category, position).await
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                FetchOutcome::Fetched(record) => Some(record),
                FetchOutcome::Failed { url, error } => {
                    tracing::debug!("Dropping {}: {}", url, error);
                    None
                }
                FetchOutcome::Skipped { url } => {
                    tracing::debug!("Deadline passed, not fetching {}", url);
                    None
                }
            })
            .collect()
    }

    /// Trims a batch to the remaining `max-pages` budget
    ///
    /// Returns the batch and whether anything was cut.
    fn within_page_budget(
        &self,
        mut targets: Vec<CrawlTarget>,
        dispatched: &mut usize,
    ) -> (Vec<CrawlTarget>, bool) {
        let mut capped = false;
        if let Some(max) = self.settings.max_pages {
            let remaining = max.saturating_sub(*dispatched);
            if targets.len() > remaining {
                targets.truncate(remaining);
                capped = true;
            }
        }
        *dispatched += targets.len();
        (targets, capped)
    }

    /// Drops decoded bodies once links are extracted, unless the report wants them
    fn release_bodies(&self, records: &mut [PageRecord]) {
        if !self.keep_bodies {
            for record in records {
                record.body = String::new();
            }
        }
    }

    fn page_budget_spent(&self, dispatched: usize) -> bool {
        self.settings.max_pages.is_some_and(|max| dispatched >= max)
    }
}

/// Resolves every anchor on the given pages into unique canonical URLs
///
/// Order is first-seen order across the pages, which keeps the next level's
/// queue deterministic.
fn discover_links(pages: &[PageRecord]) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for page in pages {
        let base = match Url::parse(&page.url) {
            Ok(base) => base,
            Err(e) => {
                tracing::debug!("Skipping link extraction for {}: {}", page.url, e);
                continue;
            }
        };

        let parsed = parse_html(&page.body);
        for href in parsed.hrefs() {
            if let Some(link) = resolve_link(href, &base) {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
    }

    links
}
