//! Integration test harness
//!
//! Cargo only discovers `tests/<dir>/main.rs`, so the test modules are
//! collected here.

mod crawl_tests;
mod frontier_tests;
