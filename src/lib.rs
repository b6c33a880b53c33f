//! kb-harvest: a site-to-knowledge-base crawler
//!
//! This crate crawls a single site breadth-first, extracts the readable
//! content of each page as markdown, classifies it by content type, and
//! collects the results into a knowledge-base document.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for kb-harvest operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid entry URL {url}: {source}")]
    InvalidEntryUrl { url: String, source: UrlError },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Empty or fragment-only reference: {0:?}")]
    NoTarget(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for kb-harvest operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{Classifier, ContentType};
pub use config::Config;
pub use crawler::{crawl, Crawler};
pub use output::{CrawlResult, KnowledgeItem};
pub use state::PageState;
pub use crate::url::{normalize, normalize_entry, same_host, NormalizedUrl};
