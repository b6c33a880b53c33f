//! JSON knowledge-base writer
//!
//! This module writes the crawl result as a single pretty-printed JSON
//! document and derives default output file names from the site URL.

use crate::output::traits::{CrawlResult, OutputHandler, OutputResult};
use crate::url::{extract_domain, normalize_entry};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Fallback file name when the site URL has no usable host
const FALLBACK_OUTPUT: &str = "site_scraped.json";

/// Writes crawl results to a JSON file
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    /// Creates a handler writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the destination path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for JsonOutputHandler {
    fn write_result(&self, result: &CrawlResult) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, result)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::debug!(
            "Wrote {} items to {}",
            result.items.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Serializes a crawl result as pretty-printed JSON
///
/// Non-ASCII characters are written as-is, not escaped.
pub fn to_json_string(result: &CrawlResult) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Derives the default output file name from a site URL
///
/// The host loses a leading `www.`, dots become underscores, and
/// `_scraped.json` is appended.
///
/// # Examples
///
/// ```
/// use kb_harvest::output::default_output_path;
///
/// let path = default_output_path("https://www.quill.co/blog");
/// assert_eq!(path.to_str(), Some("quill_co_scraped.json"));
/// ```
pub fn default_output_path(site_url: &str) -> PathBuf {
    let host = normalize_entry(site_url)
        .ok()
        .and_then(|url| extract_domain(url.as_url()));

    match host {
        Some(host) => {
            let host = host.strip_prefix("www.").unwrap_or(&host);
            PathBuf::from(format!("{}_scraped.json", host.replace('.', "_")))
        }
        None => PathBuf::from(FALLBACK_OUTPUT),
    }
}
