//! Moss main entry point
//!
//! This is the command-line interface for the Moss site mapper.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use moss::config::{load_config_with_hash, validate, validate_seed_url, AppInfo, Config};
use moss::crawler::crawl;
use moss::output::{print_statistics, write_report, CrawlStatistics, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Moss: a breadth-first site mapper
///
/// Moss crawls every page reachable from a seed URL on the seed's host,
/// fetches each linked resource once, and labels it (internal page, image,
/// download, social profile, email, ...).
#[derive(Parser, Debug)]
#[command(name = "moss")]
#[command(version)]
#[command(about = "A breadth-first site mapper that classifies every link", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site starting from a seed URL
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Seed URL; must start with http:// or https://
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Timeout for each request, in seconds [default: 5]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Show a progress line for every fetched URL
    #[arg(long)]
    live: bool,

    /// Report format [default: csv]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Directory to write the report into [default: current directory]
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Maximum fetches in flight [default: 16]
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Stop after this many breadth-first levels
    #[arg(long, value_name = "N")]
    max_levels: Option<u32>,

    /// Stop after this many fetches
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Stop dispatching new fetches after this many seconds
    #[arg(long, value_name = "SECONDS")]
    max_duration: Option<u64>,

    /// Include fetched bodies in JSON reports
    #[arg(long)]
    include_body: bool,
}

impl RunArgs {
    /// Applies command-line flags on top of file configuration
    fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.crawler.timeout = timeout;
        }
        if self.live {
            config.crawler.live = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.concurrency = concurrency;
        }
        if self.max_levels.is_some() {
            config.crawler.max_levels = self.max_levels;
        }
        if self.max_pages.is_some() {
            config.crawler.max_pages = self.max_pages;
        }
        if self.max_duration.is_some() {
            config.crawler.max_duration = self.max_duration;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output) = &self.output {
            config.output.directory = Some(output.clone());
        }
        if self.include_body {
            config.output.include_body = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let app = AppInfo::current();
    if !cli.quiet {
        println!("{}", app.banner());
    }

    match cli.command {
        Command::Run(args) => handle_run(args, &app, cli.quiet).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("moss=info,warn"),
            1 => EnvFilter::new("moss=debug,info"),
            2 => EnvFilter::new("moss=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the main crawl operation
async fn handle_run(args: RunArgs, app: &AppInfo, quiet: bool) -> anyhow::Result<()> {
    // Reject the seed before anything touches the network
    let seed = validate_seed_url(&args.seed)?;

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    args.apply(&mut config);
    validate(&config)?;

    tracing::info!(
        "Timeout: {}s, concurrency: {}, max levels: {:?}, max pages: {:?}, max duration: {:?}",
        config.crawler.timeout,
        config.crawler.concurrency,
        config.crawler.max_levels,
        config.crawler.max_pages,
        config.crawler.max_duration
    );

    let report = crawl(seed, &config).await?;

    if !quiet {
        print_statistics(&CrawlStatistics::from_report(&report), app);
    }

    let path = write_report(&report, &config.output).with_context(|| {
        let directory = config
            .output
            .directory
            .as_deref()
            .map_or_else(|| ".".to_string(), |d| d.display().to_string());
        format!("Failed to write crawl report into {}", directory)
    })?;
    if !quiet {
        println!("[✓] Report saved to: {}", path.display());
    }

    Ok(())
}
