//! Content-shape detectors used when the URL says nothing

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `Speaker 1: ...`, `Jane Doe: ...`, `**Host:** ...`
static SPEAKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:\*\*)?(Speaker\s+\d+|[A-Z][A-Za-z.'-]*(?:\s+[A-Z][A-Za-z.'-]*){0,2})(?:\*\*)?:(?:\*\*)?\s+\S",
    )
    .expect("speaker pattern is valid")
});

/// Labels that introduce callouts or FAQ entries rather than a speaker
const CALLOUT_LABELS: &[&str] = &[
    "q", "a", "question", "answer", "note", "notes", "nb", "tip", "tips", "hint", "warning",
    "caution", "danger", "important", "info", "example", "examples", "update", "edit", "step",
    "summary", "source", "result", "output", "input", "problem", "solution", "fix", "reason",
    "pros", "cons", "disclaimer", "prerequisites", "requirements",
];

/// `[00:12]`, `(01:02:03)`, `00:12:34 ...`
static TIMESTAMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\[(]?\d{1,2}:\d{2}(?::\d{2})?[\])]?\s").expect("timestamp pattern is valid")
});

static REDDIT_USER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s(\[])/?u/[A-Za-z0-9_-]{3,}").expect("reddit user pattern is valid")
});

static REDDIT_SUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s(\[])/?r/[A-Za-z0-9_]{2,}").expect("subreddit pattern is valid")
});

static VOTE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*-?\d+\s+points?\b").expect("vote pattern is valid")
});

static QUOTED_PASSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*>\s*\S|["“][^"”\n]{10,}["”]"#).expect("quote pattern is valid")
});

/// Detects a transcript layout
///
/// Either `min_lines` timestamped lines, or `min_lines` speaker-labelled
/// lines naming at least two distinct speakers.
pub fn has_speaker_labels(text: &str, min_lines: usize) -> bool {
    let mut timestamp_lines = 0;
    let mut speaker_lines = 0;
    let mut speakers = HashSet::new();

    for line in text.lines() {
        if TIMESTAMP_LINE.is_match(line) {
            timestamp_lines += 1;
        }
        if let Some(caps) = SPEAKER_LINE.captures(line) {
            let label = &caps[1];
            if is_callout_label(label) {
                continue;
            }
            speaker_lines += 1;
            speakers.insert(label.to_string());
        }
    }

    timestamp_lines >= min_lines || (speaker_lines >= min_lines && speakers.len() >= 2)
}

/// Case and dots are ignored, so `N.B.` is `nb`
fn is_callout_label(label: &str) -> bool {
    let label: String = label.chars().filter(|c| *c != '.').collect();
    CALLOUT_LABELS
        .iter()
        .any(|callout| callout.eq_ignore_ascii_case(&label))
}

/// Detects reddit-style comment text
pub fn has_reddit_markers(text: &str) -> bool {
    if REDDIT_USER.is_match(text) && REDDIT_SUB.is_match(text) {
        return true;
    }
    VOTE_LINE.is_match(text) && text.to_ascii_lowercase().contains("permalink")
}

/// Detects a short, single-paragraph post built around a quotation
pub fn is_short_quoted_post(text: &str, max_chars: usize) -> bool {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > max_chars {
        return false;
    }

    let single_paragraph = !text.lines().any(|line| line.trim().is_empty());
    single_paragraph && QUOTED_PASSAGE.is_match(text)
}
