//! Output handler traits and types
//!
//! This module defines the knowledge-base document produced by a crawl and
//! the trait interface for writing it somewhere.

use crate::classify::ContentType;
use crate::url::NormalizedUrl;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One extracted, classified page
///
/// Field order here is the field order of the output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeItem {
    /// Best-effort page title (may be empty)
    pub title: String,

    /// Extracted markdown, never empty
    pub content: String,

    /// Detected content type
    pub content_type: ContentType,

    /// The normalized URL that was fetched
    pub source_url: NormalizedUrl,
}

/// The knowledge-base document for one crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlResult {
    /// The entry URL exactly as the caller supplied it
    pub site: String,

    /// Items in the order their pages completed
    pub items: Vec<KnowledgeItem>,
}

impl CrawlResult {
    /// Creates an empty result for a site
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            items: Vec::new(),
        }
    }

    /// Returns the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no page produced an item
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trait for output handlers
///
/// An output handler persists a finished crawl result.
pub trait OutputHandler {
    /// Writes the crawl result
    ///
    /// # Arguments
    ///
    /// * `result` - The finished crawl result
    fn write_result(&self, result: &CrawlResult) -> OutputResult<()>;
}
