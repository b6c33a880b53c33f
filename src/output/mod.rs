//! Output module for the crawl result and its statistics
//!
//! This module handles:
//! - The knowledge-base document (`CrawlResult`, `KnowledgeItem`)
//! - Writing it as JSON
//! - Recording and printing crawl statistics

mod json;
pub mod stats;
mod traits;

pub use json::{default_output_path, to_json_string, JsonOutputHandler};
pub use stats::{print_statistics, CrawlStats, FailedPage};
pub use traits::{CrawlResult, KnowledgeItem, OutputError, OutputHandler, OutputResult};
