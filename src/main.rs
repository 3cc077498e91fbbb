use anyhow::Result;
use cardscraper::{extract, fetch, output};
use reqwest::blocking::Client;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Scrape the current-cardinals page into `current_cardinals.csv`.
/// Pass `--refresh` to bypass the HTML cache.
fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,cardscraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let force_refresh = std::env::args().skip(1).any(|a| a == "--refresh");

    // ─── 2) fetch page (cache-if-present) ────────────────────────────
    let client = Client::new();
    let html = fetch::fetch_cardinals_page(&client, force_refresh)?;

    // ─── 3) extract marked tables into one flat dataset ──────────────
    let dataset = extract::extract_dataset(&html)?;
    info!(
        rows = dataset.rows.len(),
        columns = dataset.columns.len(),
        "extracted cardinals dataset"
    );

    // ─── 4) write CSV and show the head ──────────────────────────────
    output::write_csv(&dataset, Path::new(output::OUTPUT_FILE))?;
    for row in dataset.rows.iter().take(5) {
        info!(?row, "head");
    }

    info!("all done");
    Ok(())
}
