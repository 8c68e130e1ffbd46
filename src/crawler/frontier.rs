//! Breadth-first frontier
//!
//! Tracks the current level's queue, the next level's queue and the visited
//! set. A URL enters the visited set the moment it is scheduled (for either
//! queue or a one-shot fetch), so it can never be handed out twice.

use std::collections::HashSet;
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Address to request
    pub url: Url,
    /// Level the URL was scheduled for
    pub level: u32,
}

/// Level-by-level crawl queue with at-most-once scheduling
#[derive(Debug)]
pub struct Frontier {
    level: u32,
    current: Vec<CrawlTarget>,
    next: Vec<CrawlTarget>,
    visited: HashSet<Url>,
}

impl Frontier {
    /// Creates a frontier holding only the seed at level 1
    ///
    /// `canonical_seed` is the seed's dedup key; the seed itself is fetched
    /// exactly as given.
    pub fn new(seed: Url, canonical_seed: Url) -> Self {
        let mut visited = HashSet::new();
        visited.insert(canonical_seed);

        Self {
            level: 1,
            current: vec![CrawlTarget {
                url: seed,
                level: 1,
            }],
            next: Vec::new(),
            visited,
        }
    }

    /// Current level, starting at 1
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns true if the current level has nothing left to fetch
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Drains the current level's queue in insertion order
    pub fn take_level(&mut self) -> Vec<CrawlTarget> {
        std::mem::take(&mut self.current)
    }

    /// Queues a canonical internal URL for the next level
    ///
    /// Returns false if the URL was already visited or scheduled.
    pub fn schedule(&mut self, url: Url) -> bool {
        if !self.visited.insert(url.clone()) {
            return false;
        }
        self.next.push(CrawlTarget {
            url,
            level: self.level + 1,
        });
        true
    }

    /// Claims a canonical URL for a one-shot fetch in the current level
    ///
    /// Returns the target if this is the first time the URL is seen.
    pub fn claim(&mut self, url: Url) -> Option<CrawlTarget> {
        if !self.visited.insert(url.clone()) {
            return None;
        }
        Some(CrawlTarget {
            url,
            level: self.level,
        })
    }

    #[cfg(test)]
    fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs queued for the next level
    pub fn pending(&self) -> usize {
        self.next.len()
    }

    #[cfg(test)]
    fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Promotes the next level's queue to current and bumps the level
    pub fn advance(&mut self) {
        self.current = std::mem::take(&mut self.next);
        self.level += 1;
    }
}
