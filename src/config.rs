// src/config.rs
// =============================================================================
// Runtime settings for a crawl.
//
// The defaults reproduce the behaviour people expect from the tool out of the
// box: crawl books.toscrape.com with 20 requests in flight, give every request
// 10 seconds, and write everything under ./output.
//
// CrawlConfig is built from the global CLI flags (see cli.rs) and is then
// handed to the Crawler, which passes the relevant pieces down to each stage.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ROOT_URL: &str = "https://books.toscrape.com/index.html";
pub const DEFAULT_BOOK_URL: &str =
    "https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html";
pub const DEFAULT_CATEGORY_URL: &str =
    "https://books.toscrape.com/catalogue/category/books/mystery_3/index.html";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_WORKERS: usize = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Safety net against a site whose "next" links loop forever
pub const DEFAULT_MAX_PAGES: usize = 1000;

pub const USER_AGENT: &str = concat!("bookshelf-crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Page carrying the category navigation
    pub root_url: Url,
    /// Base directory for CSV files and cover images
    pub output_dir: PathBuf,
    /// Maximum requests in flight inside one pool
    pub workers: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum list pages followed per category
    pub max_pages: usize,
    pub user_agent: String,
}

impl CrawlConfig {
    /// Directory used for single-book exports
    pub fn single_book_dir(&self) -> PathBuf {
        self.output_dir.join("books")
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: Url::parse(DEFAULT_ROOT_URL).expect("default root URL is valid"),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            workers: DEFAULT_WORKERS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: USER_AGENT.to_string(),
        }
    }
}
