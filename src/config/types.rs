use crate::classify::{
    Classifier, ContentType, Rule, Signal, DEFAULT_MAX_POST_CHARS, DEFAULT_MIN_SPEAKER_LINES,
};
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent; many sites reject empty or library defaults
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for kb-harvest
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to visit in one crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Pause after each processed page (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Extracted markdown shorter than this is treated as empty
    #[serde(rename = "min-content-length")]
    pub min_content_length: usize,
}

impl CrawlerConfig {
    /// Returns the rate-limit delay
    ///
    /// Values a `Duration` cannot hold (negative, NaN, infinite or out of
    /// range) give no delay; `validate` rejects them up front.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds).unwrap_or(Duration::ZERO)
    }

    /// Returns the per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            delay_seconds: 0.5,
            request_timeout_secs: 15,
            min_content_length: 100,
        }
    }
}

/// User agent configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Classification table override
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierConfig {
    /// Ordered rules; empty means the built-in table
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl ClassifierConfig {
    /// Builds the classifier described by this section
    pub fn build(&self) -> Result<Classifier, ConfigError> {
        let rules = self
            .rules
            .iter()
            .map(RuleEntry::to_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Classifier::new(rules))
    }
}

/// Signal kinds as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    PathToken,
    Host,
    DateSegment,
    SpeakerLabels,
    RedditMarkers,
    ShortQuotedPost,
}

/// One `[[classifier.rules]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub signal: SignalKind,

    /// Path tokens or hosts, for `path-token` and `host`
    #[serde(default)]
    pub markers: Vec<String>,

    /// Threshold for `speaker-labels`
    #[serde(rename = "min-lines")]
    pub min_lines: Option<usize>,

    /// Threshold for `short-quoted-post`
    #[serde(rename = "max-chars")]
    pub max_chars: Option<usize>,

    pub label: ContentType,
}

impl RuleEntry {
    /// Converts the entry into a classifier rule
    pub fn to_rule(&self) -> Result<Rule, ConfigError> {
        let signal = match self.signal {
            SignalKind::PathToken | SignalKind::Host => {
                let markers: Vec<String> = self
                    .markers
                    .iter()
                    .map(|m| m.trim().to_lowercase())
                    .filter(|m| !m.is_empty())
                    .collect();

                if markers.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "classifier rule {:?} -> {} needs at least one marker",
                        self.signal, self.label
                    )));
                }

                if self.signal == SignalKind::PathToken {
                    Signal::PathToken(markers)
                } else {
                    Signal::Host(markers)
                }
            }
            SignalKind::DateSegment => Signal::DateSegment,
            SignalKind::SpeakerLabels => Signal::SpeakerLabels {
                min_lines: self.min_lines.unwrap_or(DEFAULT_MIN_SPEAKER_LINES),
            },
            SignalKind::RedditMarkers => Signal::RedditMarkers,
            SignalKind::ShortQuotedPost => Signal::ShortQuotedPost {
                max_chars: self.max_chars.unwrap_or(DEFAULT_MAX_POST_CHARS),
            },
        };

        Ok(Rule::new(signal, self.label))
    }
}
