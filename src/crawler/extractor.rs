//! Readable content extraction
//!
//! Turns a raw HTML page into markdown for the knowledge base, keeping the
//! main content region and dropping page chrome.

use htmd::HtmlToMarkdown;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Content regions tried in order; the first present wins
const CONTENT_ROOTS: &[&str] = &["article", "main", "[role=main]", "body"];

/// Title sources tried in order; the first present element wins
const TITLE_SELECTORS: &[&str] = &["h1", "title", ".post-title", ".entry-title", ".article-title"];

/// Elements that never carry readable content
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "form", "noscript", "iframe", "svg",
];

static CONTENT_ROOT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_ROOTS
        .iter()
        .map(|s| Selector::parse(s).expect("valid content root selector"))
        .collect()
});

static TITLE_SELECTOR_LIST: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    TITLE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("valid title selector"))
        .collect()
});

static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+\n").expect("valid blank line regex"));

/// Markdown and title pulled from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Readable content as markdown
    pub markdown: String,

    /// Title found in the document, if any
    pub title: Option<String>,
}

/// Extracts readable content from an HTML document
pub trait ContentExtractor: Send + Sync {
    /// Returns `None` when the page has no readable content
    fn extract(&self, html: &str, url: &Url) -> Option<ExtractedContent>;
}

/// Default extractor: main content region converted with htmd
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadableExtractor;

impl ReadableExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ContentExtractor for ReadableExtractor {
    fn extract(&self, html: &str, url: &Url) -> Option<ExtractedContent> {
        let document = Html::parse_document(html);
        let title = extract_title(&document);

        let region = CONTENT_ROOT_SELECTORS
            .iter()
            .find_map(|selector| document.select(selector).next())
            .map(|element| element.html())?;

        let markdown = match html_to_markdown(&region) {
            Ok(markdown) => markdown,
            Err(e) => {
                tracing::debug!("Markdown conversion failed for {}: {}", url, e);
                return None;
            }
        };

        if markdown.is_empty() {
            return None;
        }

        Some(ExtractedContent { markdown, title })
    }
}

/// Returns the trimmed text of the first title element present
///
/// An empty first match yields `None` rather than trying later selectors.
fn extract_title(document: &Html) -> Option<String> {
    TITLE_SELECTOR_LIST
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

/// Converts an HTML fragment to tidy markdown
fn html_to_markdown(html: &str) -> std::io::Result<String> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();
    let raw = converter.convert(html)?;
    Ok(tidy_markdown(&raw))
}

/// Strips trailing whitespace and collapses runs of blank lines
fn tidy_markdown(markdown: &str) -> String {
    let trimmed_lines = markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_LINE_RUNS
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
