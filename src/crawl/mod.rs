// src/crawl/mod.rs
// =============================================================================
// This module handles crawling the catalogue.
//
// Submodules:
// - discovery: reads the category menu from the home page
// - pagination: follows a category's "next" links and collects book links
// - pool: fetches and extracts many book pages with bounded concurrency
// - pipeline: ties the stages together, one category at a time
// =============================================================================

mod discovery;
mod pagination;
mod pipeline;
mod pool;

pub use pipeline::{CategoryReport, CrawlSummary, Crawler};
pub use pool::run_bounded;
