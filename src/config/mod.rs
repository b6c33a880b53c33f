//! Configuration module for kb-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional, so the crawler runs with no config file at all.
//!
//! # Example
//!
//! ```no_run
//! use kb_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kb-harvest.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifierConfig, Config, CrawlerConfig, RuleEntry, SignalKind, UserAgentConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
