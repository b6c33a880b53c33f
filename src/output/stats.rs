//! Crawl statistics
//!
//! This module provides the counters gathered during one crawl and the
//! functionality for displaying them.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A page that ended in an error state
#[derive(Debug, Clone, PartialEq)]
pub struct FailedPage {
    /// The normalized URL that was fetched
    pub url: String,

    /// Terminal state of the page
    pub state: PageState,

    /// Human-readable failure reason
    pub reason: String,
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of pages processed against the budget
    pub pages_visited: u64,

    /// Count of pages by terminal state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Total number of links extracted from fetched pages
    pub links_discovered: u64,

    /// Number of links that passed the filter and joined the frontier
    pub links_enqueued: u64,

    /// Pages that failed, in visit order
    pub failures: Vec<FailedPage>,
}

impl CrawlStats {
    /// Starts a new statistics record
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            pages_by_state: HashMap::new(),
            links_discovered: 0,
            links_enqueued: 0,
            failures: Vec::new(),
        }
    }

    /// Records the terminal state of one visited page
    pub fn record(&mut self, state: PageState) {
        self.pages_visited += 1;
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    /// Records a failed page along with its reason
    pub fn record_failure(&mut self, url: &str, state: PageState, reason: impl Into<String>) {
        self.record(state);
        self.failures.push(FailedPage {
            url: url.to_string(),
            state,
            reason: reason.into(),
        });
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Returns the number of pages in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Returns the number of knowledge items recorded
    pub fn items(&self) -> u64 {
        self.count(PageState::Recorded)
    }

    /// Returns the number of pages that loaded but produced no item
    pub fn skipped(&self) -> u64 {
        self.sum_where(PageState::is_skipped)
    }

    /// Returns the number of pages that failed
    pub fn failed(&self) -> u64 {
        self.sum_where(PageState::is_error)
    }

    /// Calculates the percentage of visited pages that produced an item
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            0.0
        } else {
            (self.items() as f64 / self.pages_visited as f64) * 100.0
        }
    }

    /// Returns the crawl duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    fn sum_where(&self, predicate: fn(&PageState) -> bool) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| predicate(state))
            .map(|(_, count)| *count)
            .sum()
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {:.1}s", duration);
    }
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Links discovered: {}", stats.links_discovered);
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!();

    println!("Pages by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (state, count) in state_counts {
        let percentage = if stats.pages_visited > 0 {
            (*count as f64 / stats.pages_visited as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    if !stats.failures.is_empty() {
        println!("Failures ({}):", stats.failures.len());
        for failure in &stats.failures {
            println!("  - {} [{}]: {}", failure.url, failure.state, failure.reason);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages recorded)",
        stats.success_rate(),
        stats.items(),
        stats.pages_visited
    );
}
