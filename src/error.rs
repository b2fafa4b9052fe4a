// src/error.rs
// =============================================================================
// Error types for every stage of the crawl.
//
// Each stage gets its own enum so callers can tell apart "the site is down"
// from "the page didn't look like we expected" from "the CSV file is open
// in Excel". The binary glues them together with anyhow at the top level.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Failure to retrieve a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Building the shared HTTP client failed (bad TLS backend, etc.)
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection refused, DNS failure, timeout or truncated body
    #[error("network error on {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered, but not with a 2xx status
    #[error("HTTP {status} on {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Network { source, .. } if source.is_timeout())
    }
}

/// The fetched product page did not have the structure we expect.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("field '{field}' not found")]
    FieldNotFound { field: String },

    #[error("field '{field}' has unparseable value '{value}'")]
    InvalidValue { field: String, value: String },
}

/// Why one product link did not become a record.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("extraction failed for {url}: {source}")]
    Extraction {
        url: String,
        #[source]
        source: ExtractionError,
    },

    /// The worker task panicked or was cancelled
    #[error("worker task for {url} did not finish: {reason}")]
    Worker { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no product entries found on {url}")]
    NoEntriesFound { url: String },
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("category navigation not found on {url}")]
    NavigationNotFound { url: String },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The destination exists but another process holds it open
    #[error("{} is locked by another program, close it and retry", .path.display())]
    Locked { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PersistenceError {
    /// Maps an open/create failure on `path`, singling out the "file is in use" case.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            PersistenceError::Locked { path }
        } else {
            PersistenceError::Io { path, source }
        }
    }
}
