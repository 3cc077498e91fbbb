// src/fetch/mod.rs
use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use tracing::info;

use crate::error::ScrapeError;

/// The page we scrape.
pub const CARDINALS_URL: &str = "https://en.wikipedia.org/wiki/List_of_current_cardinals";

/// Local snapshot of the last fetched page. Valid indefinitely until the next
/// forced refresh; last writer wins if two processes race on it.
pub const CACHE_FILE: &str = "cardinals_page.html";

/// Fetch `url` and return the raw HTML, caching the body at `cache_path`.
///
/// With `force_refresh`, or when no cached copy exists, performs a blocking
/// GET, fails on non-success status, overwrites the cache with the full body
/// and returns it. Otherwise returns the cached content verbatim.
pub fn fetch_page(
    client: &Client,
    url: &str,
    cache_path: &Path,
    force_refresh: bool,
) -> Result<String, ScrapeError> {
    if force_refresh || !cache_path.exists() {
        let resp = client.get(url).send()?.error_for_status()?;
        let html = resp.text()?;
        fs::write(cache_path, &html).map_err(|source| ScrapeError::CacheWrite {
            path: cache_path.to_path_buf(),
            source,
        })?;
        info!(url, cache = %cache_path.display(), bytes = html.len(), "page fetched and cached");
        Ok(html)
    } else {
        let html = fs::read_to_string(cache_path).map_err(|source| ScrapeError::CacheRead {
            path: cache_path.to_path_buf(),
            source,
        })?;
        info!(cache = %cache_path.display(), bytes = html.len(), "page loaded from cache");
        Ok(html)
    }
}

/// Fixed-URL wrapper: the cardinals page with its well-known cache location.
pub fn fetch_cardinals_page(client: &Client, force_refresh: bool) -> Result<String, ScrapeError> {
    fetch_page(client, CARDINALS_URL, Path::new(CACHE_FILE), force_refresh)
}
