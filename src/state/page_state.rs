/// Page state definitions for tracking crawl progress
///
/// Every page the crawler dequeues ends in exactly one of these states.
use std::fmt;

/// Terminal state of a visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success =====
    /// Content was extracted and a knowledge item recorded
    Recorded,

    // ===== Skips =====
    /// Page loaded but had no substantive extractable content
    Skipped,

    /// Page loaded but was not HTML
    NotHtml,

    // ===== Errors =====
    /// Server answered with a non-2xx status
    HttpError,

    /// Page could not be reached (timeout, connection refused, DNS failure)
    Unreachable,

    /// Page fetch failed for other reasons (body decode, redirect loop, ...)
    Failed,
}

impl PageState {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    /// Returns true if the page loaded but produced no item
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped | Self::NotHtml)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::HttpError | Self::Unreachable | Self::Failed)
    }

    /// Returns a short lowercase name for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Skipped => "skipped",
            Self::NotHtml => "not_html",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Recorded,
            Self::Skipped,
            Self::NotHtml,
            Self::HttpError,
            Self::Unreachable,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
