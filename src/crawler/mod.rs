//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Link and content extraction from HTML
//! - Per-page processing and classification
//! - The bounded breadth-first crawl loop

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod processor;
mod scheduler;

pub use coordinator::{Crawler, DEFAULT_DELAY, DEFAULT_MAX_PAGES};
pub use extractor::{ContentExtractor, ExtractedContent, ReadableExtractor};
pub use fetcher::{build_http_client, FetchError, FetchResponse, Fetcher, HttpFetcher};
pub use parser::{AnchorLinkExtractor, LinkExtractor};
pub use processor::{
    PageOutcome, PageProcessor, ProcessedPage, SkipReason, DEFAULT_MIN_CONTENT_LENGTH,
};
pub use scheduler::Frontier;

use crate::config::Config;
use crate::output::CrawlResult;
use crate::Result;
use std::time::Duration;

/// Runs a complete crawl with the default collaborators
///
/// This is the main entry point for crawling a site. It will:
/// 1. Normalize the entry URL
/// 2. Walk same-host links breadth-first, up to `max_pages` pages
/// 3. Extract and classify each page
/// 4. Pause `delay` between pages
///
/// # Arguments
///
/// * `entry_url` - The site to crawl
/// * `max_pages` - Page budget; zero yields no items
/// * `delay` - Pause between pages
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed
/// * `Err(ScrapeError)` - The entry URL was invalid or the client could not
///   be built
pub async fn crawl(entry_url: &str, max_pages: usize, delay: Duration) -> Result<CrawlResult> {
    Crawler::from_config(&Config::default())?
        .with_max_pages(max_pages)
        .with_delay(delay)
        .crawl(entry_url)
        .await
}
