use super::shape;
use super::ContentType;
use crate::url::NormalizedUrl;
use chrono::{Datelike, Utc};
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// `2023`, `2023-05`, `2023-05-14`; ranges are checked by `is_date_segment`
static DATE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$").expect("date segment pattern is valid")
});

/// Earliest year accepted in a date segment
const MIN_DATE_YEAR: i32 = 1990;

/// Default minimum number of labelled lines for a transcript
pub const DEFAULT_MIN_SPEAKER_LINES: usize = 3;

/// Default maximum length of a social post
pub const DEFAULT_MAX_POST_CHARS: usize = 600;

/// A single piece of evidence a rule can test for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A path segment, or a `-`/`_`/`.` separated word of one, equals a marker
    PathToken(Vec<String>),

    /// The host equals a marker or is a subdomain of it
    Host(Vec<String>),

    /// A path segment looks like a date
    DateSegment,

    /// The text has transcript-style speaker labels or timestamps
    SpeakerLabels { min_lines: usize },

    /// The text carries reddit-style `u/` and `r/` references or vote lines
    RedditMarkers,

    /// The text is one short paragraph containing a quoted passage
    ShortQuotedPost { max_chars: usize },
}

impl Signal {
    /// Returns true if this signal only looks at the URL
    pub fn is_url_signal(&self) -> bool {
        matches!(self, Self::PathToken(_) | Self::Host(_) | Self::DateSegment)
    }

    /// Tests a URL signal; content signals never match here
    pub fn matches_url(&self, url: &NormalizedUrl) -> bool {
        match self {
            Self::PathToken(markers) => {
                let tokens = path_tokens(url.path());
                markers
                    .iter()
                    .any(|marker| tokens.iter().any(|token| token.eq_ignore_ascii_case(marker)))
            }
            Self::Host(markers) => {
                let host = url.host();
                markers.iter().any(|marker| host_matches(host, marker))
            }
            Self::DateSegment => url.path().split('/').any(is_date_segment),
            _ => false,
        }
    }

    /// Tests a content-shape signal; URL signals never match here
    pub fn matches_content(&self, text: &str) -> bool {
        match self {
            Self::SpeakerLabels { min_lines } => shape::has_speaker_labels(text, *min_lines),
            Self::RedditMarkers => shape::has_reddit_markers(text),
            Self::ShortQuotedPost { max_chars } => shape::is_short_quoted_post(text, *max_chars),
            _ => false,
        }
    }
}

/// One entry of the classification table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub signal: Signal,
    pub label: ContentType,
}

impl Rule {
    pub fn new(signal: Signal, label: ContentType) -> Self {
        Self { signal, label }
    }
}

fn markers(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Returns the default classification table
///
/// Order matters: a podcast URL that also mentions "transcript" is a
/// podcast transcript, not a call transcript.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            Signal::PathToken(markers(&["podcast", "podcasts", "episode", "episodes"])),
            ContentType::PodcastTranscript,
        ),
        Rule::new(
            Signal::Host(markers(&["reddit.com"])),
            ContentType::RedditComment,
        ),
        Rule::new(
            Signal::Host(markers(&["linkedin.com"])),
            ContentType::LinkedinPost,
        ),
        Rule::new(
            Signal::PathToken(markers(&[
                "call",
                "calls",
                "meeting",
                "meetings",
                "transcript",
                "transcripts",
            ])),
            ContentType::CallTranscript,
        ),
        Rule::new(
            Signal::PathToken(markers(&["book", "books"])),
            ContentType::Book,
        ),
        Rule::new(
            Signal::PathToken(markers(&[
                "blog",
                "blogs",
                "post",
                "posts",
                "article",
                "articles",
                "guide",
                "guides",
                "tutorial",
                "tutorials",
            ])),
            ContentType::Blog,
        ),
        Rule::new(Signal::DateSegment, ContentType::Blog),
        Rule::new(
            Signal::SpeakerLabels {
                min_lines: DEFAULT_MIN_SPEAKER_LINES,
            },
            ContentType::CallTranscript,
        ),
        Rule::new(Signal::RedditMarkers, ContentType::RedditComment),
        Rule::new(
            Signal::ShortQuotedPost {
                max_chars: DEFAULT_MAX_POST_CHARS,
            },
            ContentType::LinkedinPost,
        ),
    ]
}

/// Splits a path into whole segments plus the words inside each segment
fn path_tokens(path: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        tokens.push(segment);
        tokens.extend(
            segment
                .split(['-', '_', '.'])
                .filter(|word| !word.is_empty() && *word != segment),
        );
    }
    tokens
}

/// A publication date: a year from 1990 to now, then an optional month and day
fn is_date_segment(segment: &str) -> bool {
    let Some(caps) = DATE_SEGMENT.captures(segment) else {
        return false;
    };

    let in_range = |index: usize, range: RangeInclusive<u32>| {
        caps.get(index)
            .map_or(true, |m| m.as_str().parse::<u32>().is_ok_and(|n| range.contains(&n)))
    };

    let year_ok = caps[1]
        .parse::<i32>()
        .is_ok_and(|year| (MIN_DATE_YEAR..=Utc::now().year()).contains(&year));

    year_ok && in_range(2, 1..=12) && in_range(3, 1..=31)
}

fn host_matches(host: &str, marker: &str) -> bool {
    let marker = marker.trim_start_matches("*.").to_ascii_lowercase();
    host == marker || host.ends_with(&format!(".{}", marker))
}
