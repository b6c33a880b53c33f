//! HTML parser for extracting links
//!
//! This module parses raw HTML to find the hrefs a crawler could follow:
//! anchors and canonical links. Resolution and filtering happen later, in
//! the crawl loop, against the page's final URL.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

static CANONICAL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("link[rel='canonical'][href]").expect("valid canonical selector")
});

static BASE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("base[href]").expect("valid base selector"));

/// Extracts raw link targets from an HTML document
pub trait LinkExtractor: Send + Sync {
    /// Returns hrefs in document order
    ///
    /// Entries may be relative, absolute or junk; the caller normalizes
    /// them against `base`.
    fn extract_links(&self, html: &str, base: &Url) -> Vec<String>;
}

/// Default link extractor backed by scraper
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - stylesheets, scripts and images
///
/// `rel="nofollow"` links are followed. When the document declares
/// `<base href>`, relative hrefs are resolved against it so the caller's
/// base does not misplace them.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnchorLinkExtractor;

impl AnchorLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for AnchorLinkExtractor {
    fn extract_links(&self, html: &str, base: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        let doc_base = document_base(&document, base);
        let mut links = Vec::new();

        for element in document.select(&ANCHOR_SELECTOR) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                links.push(rebase(href.trim(), doc_base.as_ref()));
            }
        }

        for element in document.select(&CANONICAL_SELECTOR) {
            if let Some(href) = element.value().attr("href") {
                links.push(rebase(href.trim(), doc_base.as_ref()));
            }
        }

        links
    }
}

/// Returns the document's `<base href>` resolved against `base`, if any
fn document_base(document: &Html, base: &Url) -> Option<Url> {
    document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| base.join(href.trim()).ok())
}

fn rebase(href: &str, doc_base: Option<&Url>) -> String {
    match doc_base {
        // Fragment-only and empty hrefs stay as they are so they get dropped
        Some(doc_base) if !href.is_empty() && !href.starts_with('#') => doc_base
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string()),
        _ => href.to_string(),
    }
}
