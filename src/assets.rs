// src/assets.rs
// =============================================================================
// Downloads cover images for a batch of records.
//
// - Same bounded pool as the page fetches (see crawl/pool.rs)
// - File name = cleaned book title + the image URL's extension (".jpg" if
//   the URL has none)
// - A file that is already on disk is skipped without touching the network,
//   so an interrupted crawl can simply be run again
// - Two records that map to the same file name share one download; the
//   first one listed wins
// - Bytes land in a ".part" file that is renamed into place, so a file that
//   exists is always complete
// - Failures are logged and counted; nothing here returns an error
// =============================================================================

use crate::crawl::run_bounded;
use crate::extract::ProductRecord;
use crate::fetch::PageFetcher;
use crate::sink::clean_filename;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

const FALLBACK_EXTENSION: &str = ".jpg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssetReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetOutcome {
    Downloaded,
    Skipped,
    Failed,
}

pub struct AssetDownloader {
    fetcher: PageFetcher,
    width: usize,
}

impl AssetDownloader {
    pub fn new(fetcher: PageFetcher, width: usize) -> Self {
        Self { fetcher, width }
    }

    pub async fn download_assets(&self, records: &[ProductRecord], destination: &Path) -> AssetReport {
        let mut report = AssetReport::default();

        let mut targets = HashSet::new();
        let mut jobs: Vec<(Url, PathBuf)> = Vec::new();

        for record in records {
            let Some(raw) = record.image_url.as_deref() else {
                continue;
            };
            let url = match Url::parse(raw) {
                Ok(url) => url,
                Err(e) => {
                    warn!(title = %record.title, image_url = raw, error = %e, "bad image URL");
                    report.failed += 1;
                    continue;
                }
            };

            let path = destination.join(image_filename(&record.title, &url));
            if !targets.insert(path.clone()) {
                debug!(path = %path.display(), %url, "cover file name already taken in this batch");
                report.skipped += 1;
                continue;
            }
            jobs.push((url, path));
        }

        if jobs.is_empty() {
            return report;
        }

        if let Err(e) = tokio::fs::create_dir_all(destination).await {
            warn!(dir = %destination.display(), error = %e, "cannot create image directory");
            report.failed += jobs.len();
            return report;
        }

        // kept to name the file if its task panics
        let submitted: Vec<PathBuf> = jobs.iter().map(|(_, path)| path.clone()).collect();

        let results = run_bounded(jobs, self.width, |_, (url, path)| {
            let fetcher = self.fetcher.clone();
            async move { download_one(&fetcher, &url, &path).await }
        })
        .await;

        for (index, joined) in results {
            let outcome = joined.unwrap_or_else(|join_error| {
                warn!(path = %submitted[index].display(), error = %join_error, "image task did not finish");
                AssetOutcome::Failed
            });
            match outcome {
                AssetOutcome::Downloaded => report.downloaded += 1,
                AssetOutcome::Skipped => report.skipped += 1,
                AssetOutcome::Failed => report.failed += 1,
            }
        }

        report
    }
}

async fn download_one(fetcher: &PageFetcher, url: &Url, path: &Path) -> AssetOutcome {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "image already on disk");
        return AssetOutcome::Skipped;
    }

    let bytes = match fetcher.fetch_bytes(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(%url, error = %e, "image download failed");
            return AssetOutcome::Failed;
        }
    };

    match write_complete(path, &bytes).await {
        Ok(()) => AssetOutcome::Downloaded,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot write image");
            AssetOutcome::Failed
        }
    }
}

// Writes next to `path` first, then renames, so `path` never holds half a file.
async fn write_complete(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let partial = partial_path(path);

    if let Err(e) = tokio::fs::write(&partial, bytes).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&partial, path).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Local file name for a book's cover.
pub fn image_filename(title: &str, image_url: &Url) -> String {
    let extension = image_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!("{}{}", clean_filename(title), extension)
}
