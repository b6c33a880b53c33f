//! Single-page processing
//!
//! Fetches one URL, pulls its links and readable content, and turns it
//! into a knowledge item. Every failure is folded into the outcome so a
//! bad page never stops the crawl.

use crate::classify::Classifier;
use crate::crawler::extractor::{ContentExtractor, ExtractedContent};
use crate::crawler::fetcher::{FetchError, FetchResponse, Fetcher};
use crate::crawler::parser::LinkExtractor;
use crate::output::KnowledgeItem;
use crate::state::PageState;
use crate::url::NormalizedUrl;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Default minimum length of extracted content, in trimmed characters
pub const DEFAULT_MIN_CONTENT_LENGTH: usize = 100;

/// Why a page that loaded produced no item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Extraction produced nothing, or less than the minimum length
    ExtractionEmpty,

    /// The response was not an HTML document
    NotHtml,
}

impl SkipReason {
    pub fn page_state(&self) -> PageState {
        match self {
            Self::ExtractionEmpty => PageState::Skipped,
            Self::NotHtml => PageState::NotHtml,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtractionEmpty => f.write_str("no substantive content"),
            Self::NotHtml => f.write_str("not an HTML document"),
        }
    }
}

/// What became of one page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Item(KnowledgeItem),
    Skipped(SkipReason),
    Failed(FetchError),
}

impl PageOutcome {
    /// Maps the outcome to its terminal page state
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Item(_) => PageState::Recorded,
            Self::Skipped(reason) => reason.page_state(),
            Self::Failed(error) => error.page_state(),
        }
    }
}

/// Result of processing one page
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPage {
    pub outcome: PageOutcome,

    /// Raw hrefs found on the page; empty unless the page loaded as HTML
    pub links: Vec<String>,

    /// URL links should be resolved against (the URL after redirects)
    pub base_url: Url,
}

impl ProcessedPage {
    fn failed(url: &NormalizedUrl, error: FetchError) -> Self {
        Self {
            outcome: PageOutcome::Failed(error),
            links: Vec::new(),
            base_url: url.as_url().clone(),
        }
    }
}

/// Fetch, extract and classify step for a single URL
///
/// The processor holds its collaborators behind `Arc` so one instance can
/// serve any number of crawls.
#[derive(Clone)]
pub struct PageProcessor {
    fetcher: Arc<dyn Fetcher>,
    link_extractor: Arc<dyn LinkExtractor>,
    content_extractor: Arc<dyn ContentExtractor>,
    classifier: Classifier,
    min_content_length: usize,
}

impl PageProcessor {
    /// Creates a processor from its collaborators
    ///
    /// # Arguments
    ///
    /// * `fetcher` - HTTP transport
    /// * `link_extractor` - Anchor href parser
    /// * `content_extractor` - HTML to markdown extraction
    /// * `classifier` - Content-type rules
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        link_extractor: Arc<dyn LinkExtractor>,
        content_extractor: Arc<dyn ContentExtractor>,
        classifier: Classifier,
    ) -> Self {
        Self {
            fetcher,
            link_extractor,
            content_extractor,
            classifier,
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
        }
    }

    /// Sets the minimum length of extracted content
    pub fn with_min_content_length(mut self, min_content_length: usize) -> Self {
        self.min_content_length = min_content_length;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Processes one page
    ///
    /// Makes a single request. Links are parsed from the raw HTML before
    /// extraction, so a page with no usable content still contributes them.
    pub async fn process(&self, url: &NormalizedUrl) -> ProcessedPage {
        let response = match self.fetcher.fetch(url).await {
            Ok(response) => response,
            Err(e) => return ProcessedPage::failed(url, e),
        };

        if !response.is_success() {
            return ProcessedPage::failed(
                url,
                FetchError::Http {
                    status: response.status,
                },
            );
        }

        if !response.is_html() {
            return ProcessedPage {
                outcome: PageOutcome::Skipped(SkipReason::NotHtml),
                links: Vec::new(),
                base_url: response.final_url,
            };
        }

        let FetchResponse {
            final_url: base_url,
            body,
            ..
        } = response;

        let links = self.link_extractor.extract_links(&body, &base_url);

        let outcome = match self.content_extractor.extract(&body, &base_url) {
            Some(content) if self.is_substantive(&content.markdown) => {
                PageOutcome::Item(self.build_item(url, content))
            }
            _ => PageOutcome::Skipped(SkipReason::ExtractionEmpty),
        };

        ProcessedPage {
            outcome,
            links,
            base_url,
        }
    }

    /// Empty content never counts, whatever the configured minimum
    fn is_substantive(&self, markdown: &str) -> bool {
        markdown.trim().chars().count() >= self.min_content_length.max(1)
    }

    fn build_item(&self, url: &NormalizedUrl, content: ExtractedContent) -> KnowledgeItem {
        let title = resolve_title(content.title, &content.markdown, url);
        let content_type = self.classifier.classify(url, &content.markdown);

        KnowledgeItem {
            title,
            content: content.markdown,
            content_type,
            source_url: url.clone(),
        }
    }
}

impl fmt::Debug for PageProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageProcessor")
            .field("classifier", &self.classifier)
            .field("min_content_length", &self.min_content_length)
            .finish_non_exhaustive()
    }
}

/// Picks a title: document title, first `# ` heading, then the URL slug
fn resolve_title(found: Option<String>, markdown: &str, url: &NormalizedUrl) -> String {
    found
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| first_heading(markdown))
        .unwrap_or_else(|| title_from_path(url.path()))
}

fn first_heading(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|heading| heading.trim().to_string())
        .filter(|heading| !heading.is_empty())
}

/// Title-cases the last path segment, treating `-` and `_` as spaces
fn title_from_path(path: &str) -> String {
    let slug = path.rsplit('/').next().unwrap_or("");
    let mut title = String::with_capacity(slug.len());
    let mut prev_is_letter = false;

    for c in slug.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            title.push(c);
            prev_is_letter = false;
        }
    }

    title
}
