//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a browser user agent and timeouts
//! - GET requests to fetch page content
//! - Error classification into timeout, connection and transport failures

use crate::config::Config;
use crate::state::PageState;
use crate::url::NormalizedUrl;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Longest redirect chain followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Connect timeout applied regardless of the request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// MIME types treated as HTML
const HTML_MIME_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// A fetched HTTP response, any status
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Final URL after redirects
    pub final_url: Url,

    /// Content-Type header value, if any
    pub content_type: Option<String>,

    /// Decoded page body; empty unless the response is a 2xx HTML page
    pub body: String,
}

impl FetchResponse {
    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true unless the Content-Type names a non-HTML type
    ///
    /// A missing header counts as HTML.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            None => true,
            Some(value) => {
                let mime = value
                    .split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_ascii_lowercase();
                mime.is_empty() || HTML_MIME_TYPES.contains(&mime.as_str())
            }
        }
    }
}

/// Per-page fetch failures
///
/// None of these abort a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}")]
    Http { status: u16 },
}

impl FetchError {
    /// Maps the failure to the page state it leaves behind
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Timeout | Self::Connect(_) => PageState::Unreachable,
            Self::Http { .. } => PageState::HttpError,
            Self::Transport(_) => PageState::Failed,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // Classify error
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Fetches one URL
///
/// Implementations make exactly one logical request per call and do not
/// retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, returning the response for any HTTP status
    ///
    /// Only 2xx HTML bodies need to be read; other bodies may be left empty.
    async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use kb_harvest::config::Config;
/// use kb_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.value.as_str())
        .timeout(config.crawler.request_timeout())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Default fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the crawler configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut page = FetchResponse {
            status,
            final_url,
            content_type,
            body: String::new(),
        };

        // Error pages and non-HTML payloads are dropped without being downloaded
        if page.is_success() && page.is_html() {
            page.body = response.text().await?;
        } else {
            tracing::debug!(
                "Not reading body of {} (HTTP {}, {})",
                url,
                page.status,
                page.content_type.as_deref().unwrap_or("no content type")
            );
        }

        Ok(page)
    }
}
