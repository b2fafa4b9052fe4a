// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every pipeline variant is a subcommand:
//   bookshelf-crawler book [URL]        one product page -> one CSV
//   bookshelf-crawler category [URL]    one category     -> one CSV
//   bookshelf-crawler all               every category   -> one CSV each
//   bookshelf-crawler images            same as `all`, plus cover images
//   bookshelf-crawler menu              interactive numbered menu
//
// Running without a subcommand opens the menu. The global flags tune the
// crawl and are turned into a CrawlConfig by `build_config`.
// =============================================================================

use crate::config::{
    CrawlConfig, DEFAULT_BOOK_URL, DEFAULT_CATEGORY_URL, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT_DIR,
    DEFAULT_ROOT_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS, USER_AGENT,
};
use clap::builder::TypedValueParser;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "bookshelf-crawler",
    version,
    about = "Crawl a book catalogue into per-category CSV files and cover images",
    long_about = "bookshelf-crawler walks every category of a books.toscrape.com style catalogue, \
                  fetches each book page with a fixed number of parallel requests, and writes \
                  one CSV per category. Cover images can be downloaded alongside."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Home page carrying the category menu
    #[arg(long, global = true, default_value = DEFAULT_ROOT_URL)]
    pub root_url: Url,

    /// Directory receiving CSV files and covers
    #[arg(long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Number of requests in flight at once
    #[arg(long, global = true, default_value_t = DEFAULT_WORKERS,
          value_parser = clap::value_parser!(u16).range(1..=256).map(usize::from))]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Maximum list pages followed in one category
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PAGES,
          value_parser = clap::value_parser!(u32).range(1..).map(|n| n as usize))]
    pub max_pages: usize,

    /// Print the final report as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scrape a single book page
    Book {
        #[arg(default_value = DEFAULT_BOOK_URL)]
        url: Url,
    },

    /// Scrape every book of one category
    Category {
        #[arg(default_value = DEFAULT_CATEGORY_URL)]
        url: Url,
    },

    /// Scrape every category listed on the home page
    All,

    /// Scrape every category and download the cover images
    Images,

    /// Open the interactive menu
    Menu,
}

/// One pipeline run, whichever way it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Book(Url),
    Category(Url),
    All,
    AllWithImages,
}

impl Commands {
    /// `None` for the menu, which is not a pipeline run by itself.
    pub fn action(&self) -> Option<Action> {
        match self {
            Commands::Book { url } => Some(Action::Book(url.clone())),
            Commands::Category { url } => Some(Action::Category(url.clone())),
            Commands::All => Some(Action::All),
            Commands::Images => Some(Action::AllWithImages),
            Commands::Menu => None,
        }
    }
}

impl Cli {
    pub fn build_config(&self) -> CrawlConfig {
        CrawlConfig {
            root_url: self.root_url.clone(),
            output_dir: self.output_dir.clone(),
            workers: self.workers,
            timeout: Duration::from_secs(self.timeout_secs),
            max_pages: self.max_pages,
            user_agent: USER_AGENT.to_string(),
        }
    }
}
