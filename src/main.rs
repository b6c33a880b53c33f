//! kb-harvest main entry point
//!
//! This is the command-line interface for the kb-harvest site crawler.

use anyhow::Context;
use clap::Parser;
use kb_harvest::config::{load_config, validate, Config};
use kb_harvest::output::{default_output_path, print_statistics, JsonOutputHandler, OutputHandler};
use kb_harvest::{ContentType, CrawlResult, Crawler};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// kb-harvest: turn a website into a knowledge base
///
/// kb-harvest crawls one site breadth-first, extracts the readable content
/// of each page as markdown, classifies it, and writes everything to a
/// single JSON document.
#[derive(Parser, Debug)]
#[command(name = "kb-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a site into a JSON knowledge base", long_about = None)]
struct Cli {
    /// Site to crawl (a bare host such as `quill.co/blog` gets https://)
    #[arg(value_name = "SITE_URL")]
    site_url: String,

    /// Output JSON file (default: derived from the site host)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Pause between pages, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Per-request timeout, in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print crawl statistics after the run
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.site_url));

    match handle_crawl(&cli, &config, output).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Crawl failed: {:#}", e);
            Err(e)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kb_harvest=info,warn"),
            1 => EnvFilter::new("kb_harvest=debug,info"),
            2 => EnvFilter::new("kb_harvest=trace,debug"),
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

/// Loads the config file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("could not load {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_seconds = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }

    validate(&config).context("invalid command-line options")?;
    Ok(config)
}

/// Handles the main crawl operation
async fn handle_crawl(cli: &Cli, config: &Config, output: PathBuf) -> anyhow::Result<()> {
    let crawler = Crawler::from_config(config)?;
    let (result, stats) = crawler.crawl_with_stats(&cli.site_url).await?;

    JsonOutputHandler::new(&output)
        .write_result(&result)
        .with_context(|| format!("could not write {}", output.display()))?;

    if !cli.quiet {
        print_summary(&result);
        println!("✓ Saved {} items to {}", result.items.len(), output.display());
    }

    if cli.stats {
        println!();
        print_statistics(&stats);
    }

    Ok(())
}

/// Prints the number of items per content type
fn print_summary(result: &CrawlResult) {
    println!("=== {} ===\n", result.site);

    for content_type in ContentType::all() {
        let count = result
            .items
            .iter()
            .filter(|item| item.content_type == content_type)
            .count();
        if count > 0 {
            println!("  {}: {}", content_type, count);
        }
    }
    println!();
}
