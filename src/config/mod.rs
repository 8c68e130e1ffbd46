//! Configuration module for Moss
//!
//! Settings come from an optional TOML file; command-line flags are applied
//! on top by the binary. The tool's own identity lives in [`AppInfo`].
//!
//! # Example
//!
//! ```no_run
//! use moss::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("moss.toml")).unwrap();
//! println!("Fetching with {} workers", config.crawler.concurrency);
//! ```

mod app;
mod parser;
mod types;
mod validation;

pub use app::AppInfo;
pub use types::{Config, CrawlerConfig, DomainEntry, OutputConfig, UserAgentConfig};

pub use parser::{load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_seed_url};
