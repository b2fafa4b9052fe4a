// src/crawl/pool.rs
// =============================================================================
// The bounded worker pool: fetch and extract many product pages at once.
//
// How it works:
// - Every link becomes its own tokio task (fetch page -> extract record)
// - `buffer_unordered(width)` keeps at most `width` of those tasks running
// - Each task hands back exactly one FetchOutcome; the stream yields them in
//   completion order and we collect them into a Vec
//
// There is no shared result list the workers write into. A failing link
// (HTTP error, bad markup, even a panic inside the task) becomes a Failure
// outcome for that link only; its siblings keep going, and the call returns
// once every link has produced its outcome.
// =============================================================================

use crate::error::ScrapeError;
use crate::extract::{Extractor, ProductRecord};
use crate::fetch::PageFetcher;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{info, warn};
use url::Url;

/// Result of one attempted product link.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(ProductRecord),
    Failure { url: Url, reason: ScrapeError },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

// Runs `task` over every item with at most `width` spawned tasks in flight.
//
// Returns one entry per item, tagged with the item's position in `items`,
// in completion order. A task that panicked shows up as Err(JoinError).
pub async fn run_bounded<I, T, F, Fut>(
    items: Vec<I>,
    width: usize,
    task: F,
) -> Vec<(usize, Result<T, JoinError>)>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(usize, I) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    let width = width.max(1);

    stream::iter(items.into_iter().enumerate().map(|(index, item)| {
        // Futures are lazy: nothing runs until the buffer polls this block
        let work = task(index, item);
        async move { (index, tokio::spawn(work).await) }
    }))
    .buffer_unordered(width)
    .collect()
    .await
}

#[derive(Clone)]
pub struct FetchPool {
    fetcher: PageFetcher,
    extractor: Arc<dyn Extractor>,
    width: usize,
}

impl FetchPool {
    pub fn new(fetcher: PageFetcher, extractor: Arc<dyn Extractor>, width: usize) -> Self {
        Self {
            fetcher,
            extractor,
            width: width.max(1),
        }
    }

    /// Fetches every link and returns one outcome per link, in completion order.
    pub async fn fetch_outcomes(&self, links: Vec<Url>) -> Vec<FetchOutcome> {
        let total = links.len();
        // kept to name the link if its task panics
        let submitted = links.clone();

        let results = run_bounded(links, self.width, |index, url| {
            let fetcher = self.fetcher.clone();
            let extractor = Arc::clone(&self.extractor);
            async move {
                info!("Book {}/{}: {}", index + 1, total, url);
                match scrape_one(&fetcher, extractor.as_ref(), &url).await {
                    Ok(record) => FetchOutcome::Success(record),
                    Err(reason) => FetchOutcome::Failure { url, reason },
                }
            }
        })
        .await;

        results
            .into_iter()
            .map(|(index, joined)| {
                joined.unwrap_or_else(|join_error| {
                    let url = submitted[index].clone();
                    FetchOutcome::Failure {
                        reason: ScrapeError::Worker {
                            url: url.to_string(),
                            reason: join_error.to_string(),
                        },
                        url,
                    }
                })
            })
            .collect()
    }

    /// Fetches every link and keeps the records that made it.
    ///
    /// Failures are logged here and dropped from the result.
    pub async fn fetch_all(&self, links: Vec<Url>) -> Vec<ProductRecord> {
        let outcomes = self.fetch_outcomes(links).await;
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        let mut records = Vec::with_capacity(outcomes.len() - failed);

        for outcome in outcomes {
            match outcome {
                FetchOutcome::Success(record) => records.push(record),
                FetchOutcome::Failure { url, reason } => {
                    let timed_out = matches!(&reason, ScrapeError::Fetch(e) if e.is_timeout());
                    warn!(%url, timed_out, error = %reason, "book skipped");
                }
            }
        }

        if failed > 0 {
            warn!(failed, saved = records.len(), "some books could not be scraped");
        }
        records
    }
}

async fn scrape_one(
    fetcher: &PageFetcher,
    extractor: &dyn Extractor,
    url: &Url,
) -> Result<ProductRecord, ScrapeError> {
    let page = fetcher.fetch(url).await?;
    extractor
        .extract(&page)
        .map_err(|source| ScrapeError::Extraction {
            url: url.to_string(),
            source,
        })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::spawn inside buffer_unordered?
//    - buffer_unordered alone polls every future on the current task
//    - spawn moves each book onto the runtime's worker threads, so parsing
//      one page doesn't hold up the others
//    - a panic inside a spawned task comes back as a JoinError instead of
//      tearing down the whole crawl
//
// 2. Why Arc<dyn Extractor>?
//    - every task needs the extractor, and tasks must own what they use
//    - Arc::clone only bumps a reference count, the extractor isn't copied
//
// 3. Why is the result order random?
//    - "unordered" means results come out as tasks finish, fastest first
//    - callers that need an order must sort; the CSV doesn't care
// -----------------------------------------------------------------------------
