// src/crawl/pipeline.rs
// =============================================================================
// The crawl orchestrator.
//
//   discover categories
//     -> for each category, in menu order:
//          collect links -> fetch all books (pool) -> save CSV -> [covers]
//
// Categories run one after another; only the books inside a category are
// fetched concurrently. A category that fails to paginate or save is logged
// and recorded in its report, then the next category starts. Only a failed
// discovery ends the run, since there is nothing left to iterate.
//
// Each run captures its start instant and date once (RunContext). The date
// goes into the output file names, the instant drives the elapsed-time line
// printed after every category.
// =============================================================================

use super::discovery::{discover_categories, CategoryRef};
use super::pagination::collect_links;
use super::pool::{FetchOutcome, FetchPool};
use crate::assets::{AssetDownloader, AssetReport};
use crate::config::CrawlConfig;
use crate::error::{DiscoveryError, FetchError, ScrapeError};
use crate::extract::Extractor;
use crate::fetch::PageFetcher;
use crate::sink::{clean_filename, Sink};
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{error, info};
use url::Url;

const COVER_DIR: &str = "Book_Cover";

/// Per-run context, captured once when a run starts.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub started: Instant,
    pub stamp: NaiveDate,
}

impl RunContext {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            stamp: chrono::Local::now().date_naive(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    /// 1-based position in the site menu
    pub index: usize,
    pub name: String,
    pub url: String,
    pub links: usize,
    pub persisted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<AssetReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryReport {
    fn new(index: usize, category: &CategoryRef) -> Self {
        Self {
            index,
            name: category.name.clone(),
            url: category.url.to_string(),
            links: 0,
            persisted: 0,
            output: None,
            images: None,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub categories: Vec<CategoryReport>,
    pub elapsed_secs: f64,
}

impl CrawlSummary {
    pub fn persisted(&self) -> usize {
        self.categories.iter().map(|c| c.persisted).sum()
    }
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: PageFetcher,
    pool: FetchPool,
    assets: AssetDownloader,
    sink: Arc<dyn Sink>,
}

impl Crawler {
    pub fn new(
        config: CrawlConfig,
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self, FetchError> {
        let fetcher = PageFetcher::new(config.timeout, &config.user_agent)?;
        let pool = FetchPool::new(fetcher.clone(), extractor, config.workers);
        let assets = AssetDownloader::new(fetcher.clone(), config.workers);

        Ok(Self {
            config,
            fetcher,
            pool,
            assets,
            sink,
        })
    }

    /// Scrapes one product page and writes it to its own CSV.
    pub async fn scrape_book(&self, url: &Url) -> anyhow::Result<PathBuf> {
        let ctx = RunContext::start();

        let mut outcomes = self.pool.fetch_outcomes(vec![url.clone()]).await;
        let record = match outcomes.pop() {
            Some(FetchOutcome::Success(record)) => record,
            Some(FetchOutcome::Failure { reason, .. }) => return Err(reason.into()),
            None => {
                return Err(ScrapeError::Worker {
                    url: url.to_string(),
                    reason: "no outcome".to_string(),
                }
                .into())
            }
        };

        let path = self.sink.save_one(&record, &record.title, ctx.stamp)?;
        println!("Book '{}' exported to {}", record.title, path.display());
        Ok(path)
    }

    /// Scrapes a single category given its list page URL.
    pub async fn scrape_category(&self, url: &Url) -> CrawlSummary {
        let ctx = RunContext::start();
        let category = CategoryRef {
            name: category_name_from_url(url),
            url: url.clone(),
        };

        println!("\nScraping category {}\n", category.name);
        let report = self.crawl_category(&ctx, 1, 1, &category, false).await;

        CrawlSummary {
            categories: vec![report],
            elapsed_secs: ctx.elapsed_secs(),
        }
    }

    /// Scrapes every category listed on the site's home page.
    pub async fn scrape_all(&self, with_images: bool) -> Result<CrawlSummary, DiscoveryError> {
        let ctx = RunContext::start();

        println!("\nScraping every category of {}\n", self.config.root_url);
        let categories = discover_categories(&self.fetcher, &self.config.root_url).await?;
        let total = categories.len();
        println!("Categories found: {total}\n");

        let mut reports = Vec::with_capacity(total);
        for (i, category) in categories.iter().enumerate() {
            let report = self
                .crawl_category(&ctx, i + 1, total, category, with_images)
                .await;
            reports.push(report);
        }

        Ok(CrawlSummary {
            categories: reports,
            elapsed_secs: ctx.elapsed_secs(),
        })
    }

    async fn crawl_category(
        &self,
        ctx: &RunContext,
        index: usize,
        total: usize,
        category: &CategoryRef,
        with_images: bool,
    ) -> CategoryReport {
        let mut report = CategoryReport::new(index, category);

        println!("{}", "_".repeat(54));
        println!("Category [{}/{}]: {}", index, total, category.name);
        println!("Link: {}", category.url);
        println!("{}\n", "_".repeat(54));

        match collect_links(&self.fetcher, &category.url, self.config.max_pages).await {
            Ok(links) => {
                report.links = links.len();
                info!(category = %category.name, links = links.len(), "links collected");

                let batch = self.pool.fetch_all(links).await;

                match self
                    .sink
                    .save_batch(&batch, &category.name, &self.config.output_dir, ctx.stamp)
                {
                    Ok(output) => {
                        report.persisted = batch.len();
                        if let Some(path) = &output {
                            println!("{} books saved to {}", batch.len(), path.display());
                        }
                        report.output = output;
                    }
                    Err(e) => {
                        error!(category = %category.name, error = %e, "could not save category");
                        report.error = Some(e.to_string());
                    }
                }

                if with_images {
                    let covers = self
                        .config
                        .output_dir
                        .join(clean_filename(&category.name))
                        .join(COVER_DIR);
                    report.images = Some(self.assets.download_assets(&batch, &covers).await);
                }
            }
            Err(e) => {
                error!(category = %category.name, error = %e, "could not collect links");
                report.error = Some(e.to_string());
            }
        }

        println!("Elapsed: {:.2} seconds", ctx.elapsed_secs());
        report
    }
}

// ".../category/books/mystery_3/index.html" -> "Mystery"
pub fn category_name_from_url(url: &Url) -> String {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    let re = SLUG.get_or_init(|| Regex::new(r"/books/([^_/]+)_\d+/").expect("slug regex is valid"));

    re.captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|m| capitalize(m.as_str()))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
