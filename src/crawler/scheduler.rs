//! Crawl frontier
//!
//! This module handles:
//! - The FIFO queue of URLs waiting to be visited
//! - The seen set that keeps a URL from being queued twice
//! - The visited set consulted when a URL is dequeued

use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};

/// Breadth-first frontier for one crawl
///
/// The seen set only grows, so a URL enters the queue at most once per
/// crawl even when pages link to each other in cycles.
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be visited, in discovery order
    queue: VecDeque<NormalizedUrl>,

    /// Every URL ever queued or reached through a redirect
    seen: HashSet<NormalizedUrl>,

    /// URLs already dequeued for processing
    visited: HashSet<NormalizedUrl>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier seeded with the entry URL
    pub fn seeded(entry: NormalizedUrl) -> Self {
        let mut frontier = Self::new();
        frontier.push(entry);
        frontier
    }

    /// Queues a URL unless it was queued before
    ///
    /// # Returns
    ///
    /// `true` if the URL was added to the queue
    pub fn push(&mut self, url: NormalizedUrl) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Takes the oldest queued URL
    pub fn pop(&mut self) -> Option<NormalizedUrl> {
        self.queue.pop_front()
    }

    /// Records a URL as visited
    ///
    /// # Returns
    ///
    /// `false` if it had already been visited
    pub fn mark_visited(&mut self, url: &NormalizedUrl) -> bool {
        if self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.clone())
    }

    /// Records a URL that was reached without being dequeued, such as a
    /// redirect target
    ///
    /// The URL is never queued afterwards; a queued copy is skipped when it
    /// is dequeued.
    ///
    /// # Returns
    ///
    /// `false` if it had already been visited
    pub fn mark_seen(&mut self, url: NormalizedUrl) -> bool {
        self.seen.insert(url.clone());
        self.visited.insert(url)
    }

    /// Returns true if the URL has been queued or reached at any point
    pub fn has_seen(&self, url: &NormalizedUrl) -> bool {
        self.seen.contains(url)
    }

    /// Returns the number of URLs in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of URLs visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
