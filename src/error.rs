// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of the scrape pipeline. A mismatched eligibility-flag count
/// is deliberately NOT represented here: it degrades to omitting the
/// `eligible` column for the affected table (see `extract`).
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport failure or non-success HTTP status while fetching the page.
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The cache file exists but could not be read.
    #[error("cache read failed for {path}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fetched body could not be persisted to the cache file.
    #[error("cache write failed for {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A marked table could not be decomposed into header and body rows.
    /// Aborts extraction for the whole document.
    #[error("failed to parse marked table #{index}: {reason}")]
    Parse { index: usize, reason: String },
}
