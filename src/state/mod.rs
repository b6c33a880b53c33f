//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the terminal state of each visited page (recorded, skipped, failed, ...)

mod page_state;

// Re-export main types
pub use page_state::PageState;
