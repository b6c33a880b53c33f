//! Content-type classification for extracted pages
//!
//! Classification is an ordered list of `(signal, label)` rules. URL
//! signals are consulted before content-shape signals, and within each
//! group the first matching rule wins. A page that matches nothing is
//! labelled [`ContentType::Other`].

mod rules;
mod shape;

pub use rules::{
    default_rules, Rule, Signal, DEFAULT_MAX_POST_CHARS, DEFAULT_MIN_SPEAKER_LINES,
};

use crate::url::NormalizedUrl;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// The fixed set of content-type labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Blog,
    PodcastTranscript,
    CallTranscript,
    LinkedinPost,
    RedditComment,
    Book,
    Other,
}

impl ContentType {
    /// Returns the label as written to the output document
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::PodcastTranscript => "podcast_transcript",
            Self::CallTranscript => "call_transcript",
            Self::LinkedinPost => "linkedin_post",
            Self::RedditComment => "reddit_comment",
            Self::Book => "book",
            Self::Other => "other",
        }
    }

    /// Returns all labels
    pub fn all() -> [Self; 7] {
        [
            Self::Blog,
            Self::PodcastTranscript,
            Self::CallTranscript,
            Self::LinkedinPost,
            Self::RedditComment,
            Self::Book,
            Self::Other,
        ]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered rule-based classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default);

impl Classifier {
    /// Creates a classifier from an ordered rule list
    ///
    /// An empty list means "use the default table".
    pub fn new(rules: Vec<Rule>) -> Self {
        if rules.is_empty() {
            Self::default()
        } else {
            Self { rules }
        }
    }

    /// Returns the rules in evaluation order within their signal group
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classifies a page by its URL and extracted text
    ///
    /// All URL rules are tried first, in table order; content-shape rules
    /// are only consulted when no URL rule matched.
    pub fn classify(&self, url: &NormalizedUrl, text: &str) -> ContentType {
        let url_match = self
            .rules
            .iter()
            .filter(|rule| rule.signal.is_url_signal())
            .find(|rule| rule.signal.matches_url(url));

        if let Some(rule) = url_match {
            tracing::trace!("{} matched URL rule {:?}", url, rule.signal);
            return rule.label;
        }

        let content_match = self
            .rules
            .iter()
            .filter(|rule| !rule.signal.is_url_signal())
            .find(|rule| rule.signal.matches_content(text));

        match content_match {
            Some(rule) => {
                tracing::trace!("{} matched content rule {:?}", url, rule.signal);
                rule.label
            }
            None => ContentType::Other,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// Classifies a page with the default rule table
///
/// # Examples
///
/// ```
/// use kb_harvest::classify::{classify, ContentType};
/// use kb_harvest::url::normalize_entry;
///
/// let url = normalize_entry("https://example.com/podcast/ep-1").unwrap();
/// assert_eq!(classify(&url, "Welcome to the show"), ContentType::PodcastTranscript);
/// ```
pub fn classify(url: &NormalizedUrl, text: &str) -> ContentType {
    DEFAULT_CLASSIFIER.classify(url, text)
}
