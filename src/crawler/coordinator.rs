//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from the entry URL
//! - Enforcing the page budget and the delay between pages
//! - Filtering discovered links to the entry host
//! - Collecting knowledge items and statistics

use crate::config::{validate, Config};
use crate::crawler::extractor::ReadableExtractor;
use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::parser::AnchorLinkExtractor;
use crate::crawler::processor::{PageOutcome, PageProcessor};
use crate::crawler::scheduler::Frontier;
use crate::output::{CrawlResult, CrawlStats};
use crate::url::{normalize, normalize_entry, same_host, NormalizedUrl};
use crate::{Result, ScrapeError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default page budget
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Default pause between pages
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Pages between progress reports
const PROGRESS_INTERVAL: usize = 10;

/// Bounded breadth-first crawler for a single site
///
/// A crawler holds no per-crawl state; each call to [`Crawler::crawl`]
/// builds its own frontier and result list.
#[derive(Debug, Clone)]
pub struct Crawler {
    processor: PageProcessor,
    max_pages: usize,
    delay: Duration,
}

impl Crawler {
    /// Creates a crawler around a page processor
    ///
    /// # Arguments
    ///
    /// * `processor` - Fetch, extract and classify step
    /// * `max_pages` - Maximum number of pages to process
    /// * `delay` - Pause between consecutive pages
    pub fn new(processor: PageProcessor, max_pages: usize, delay: Duration) -> Self {
        Self {
            processor,
            max_pages,
            delay,
        }
    }

    /// Builds a crawler with the default collaborators
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(ScrapeError)` - The configuration is invalid, or the HTTP
    ///   client or the classifier rules could not be built
    pub fn from_config(config: &Config) -> Result<Self> {
        validate(config)?;

        let fetcher = HttpFetcher::from_config(config)?;
        let classifier = config.classifier.build()?;

        let processor = PageProcessor::new(
            Arc::new(fetcher),
            Arc::new(AnchorLinkExtractor::new()),
            Arc::new(ReadableExtractor::new()),
            classifier,
        )
        .with_min_content_length(config.crawler.min_content_length);

        Ok(Self::new(
            processor,
            config.crawler.max_pages,
            config.crawler.delay(),
        ))
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Crawls a site and returns its knowledge items
    ///
    /// # Arguments
    ///
    /// * `entry_url` - Starting URL; a bare host gets `https://`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Items in completion order, `site` set to
    ///   `entry_url` as given
    /// * `Err(ScrapeError::InvalidEntryUrl)` - The entry URL is unusable
    pub async fn crawl(&self, entry_url: &str) -> Result<CrawlResult> {
        self.crawl_with_stats(entry_url)
            .await
            .map(|(result, _)| result)
    }

    /// Crawls a site, also returning statistics about the run
    pub async fn crawl_with_stats(&self, entry_url: &str) -> Result<(CrawlResult, CrawlStats)> {
        let entry = normalize_entry(entry_url).map_err(|source| ScrapeError::InvalidEntryUrl {
            url: entry_url.to_string(),
            source,
        })?;

        tracing::info!(
            "Starting crawl of {} (max {} pages, {:?} delay)",
            entry,
            self.max_pages,
            self.delay
        );

        let mut frontier = Frontier::seeded(entry.clone());
        let mut result = CrawlResult::new(entry_url);
        let mut stats = CrawlStats::new();
        let mut visited = 0;
        let start_time = Instant::now();

        while visited < self.max_pages {
            let url = match frontier.pop() {
                Some(url) => url,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
            };

            if !frontier.mark_visited(&url) {
                continue;
            }

            tracing::debug!("Processing URL: {}", url);
            let page = self.processor.process(&url).await;
            let state = page.outcome.page_state();

            match page.outcome {
                PageOutcome::Item(item) => {
                    tracing::debug!("Recorded {} as {}", url, item.content_type);
                    stats.record(state);
                    result.items.push(item);
                }
                PageOutcome::Skipped(reason) => {
                    tracing::debug!("Skipped {}: {}", url, reason);
                    stats.record(state);
                }
                PageOutcome::Failed(error) => {
                    tracing::warn!("Failed to fetch {}: {}", url, error);
                    stats.record_failure(url.as_str(), state, error.to_string());
                }
            }

            // A redirect target is the same document; never fetch it again
            if let Ok(target) = normalize(page.base_url.as_str(), &page.base_url) {
                if target != url && frontier.mark_seen(target.clone()) {
                    tracing::debug!("{} redirected to {}", url, target);
                }
            }

            stats.links_discovered += page.links.len() as u64;
            stats.links_enqueued +=
                enqueue_links(&mut frontier, &entry, &page.base_url, &page.links) as u64;

            visited += 1;

            // Progress reporting every 10 pages
            if visited % PROGRESS_INTERVAL == 0 {
                let elapsed = start_time.elapsed();
                let rate = visited as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} pages visited, {} items, {} in frontier, {:.2} pages/sec",
                    visited,
                    result.items.len(),
                    frontier.len(),
                    rate
                );
            }

            // No pause once the loop is about to end
            if visited < self.max_pages && !frontier.is_empty() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        if visited >= self.max_pages && !frontier.is_empty() {
            tracing::info!(
                "Page limit of {} reached, abandoning {} queued URLs",
                self.max_pages,
                frontier.len()
            );
        }

        stats.finish();

        tracing::info!(
            "Crawl completed: {} pages visited, {} items recorded in {:?}",
            visited,
            result.items.len(),
            start_time.elapsed()
        );

        Ok((result, stats))
    }
}

/// Normalizes discovered hrefs and queues the new same-host ones
///
/// # Returns
///
/// The number of URLs added to the frontier
fn enqueue_links(
    frontier: &mut Frontier,
    entry: &NormalizedUrl,
    base_url: &Url,
    links: &[String],
) -> usize {
    let mut enqueued = 0;

    for href in links {
        let candidate = match normalize(href, base_url) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::trace!("Dropping link {:?}: {}", href, e);
                continue;
            }
        };

        if !same_host(candidate.as_url(), entry.as_url()) {
            tracing::trace!("Dropping off-site link {}", candidate);
            continue;
        }

        if frontier.push(candidate) {
            enqueued += 1;
        }
    }

    enqueued
}
