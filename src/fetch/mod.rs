// src/fetch/mod.rs
// =============================================================================
// HTTP access for the crawler.
//
// Everything that talks to the network goes through PageFetcher, so the
// timeout, user agent and text decoding rules live in one place.
// =============================================================================

mod http;

pub use http::{Page, PageFetcher};
