// src/bin/load_duck.rs
//
// Load the analytical database: the popes roster, the scraped cardinals CSV,
// and any optional extra CSV sources, each as its own DuckDB table.
//
//   load_duck [--db <path>] [--popes <csv>] [--cardinals <csv>]
//             [--conclaves <csv>] [--documents <csv>]

use anyhow::{bail, Result};
use cardscraper::{duck, output};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

struct Args {
    db: String,
    popes: String,
    cardinals: String,
    conclaves: Option<String>,
    documents: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        db: duck::DB_FILE.to_string(),
        popes: duck::POPES_CSV_URL.to_string(),
        cardinals: output::OUTPUT_FILE.to_string(),
        conclaves: None,
        documents: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || {
            it.next()
                .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--db" => args.db = value()?,
            "--popes" => args.popes = value()?,
            "--cardinals" => args.cardinals = value()?,
            "--conclaves" => args.conclaves = Some(value()?),
            "--documents" => args.documents = Some(value()?),
            other => bail!("unknown flag: {other}"),
        }
    }
    Ok(args)
}

fn show_preview(conn: &duckdb::Connection, table: &str) -> Result<()> {
    let (columns, rows) = duck::preview(conn, table, 5)?;
    info!(table, columns = ?columns, "preview");
    for row in rows {
        info!(table, ?row);
    }
    Ok(())
}

fn main() -> Result<()> {
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,cardscraper=info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = parse_args()?;
    let conn = duck::open_db(&args.db)?;
    info!(db = %args.db, "opened analytical database");

    // ─── popes roster, cleaned on import ─────────────────────────────
    duck::load_popes_table(&conn, &args.popes)?;
    // Francis's row predates his death; close the reign out.
    duck::close_reign(&conn, "Francis", "2025-04-21", 88)?;
    show_preview(&conn, "popes")?;

    // ─── scraped cardinals, when the scraper has run ─────────────────
    if Path::new(&args.cardinals).exists() || args.cardinals.contains("://") {
        match duck::load_csv_table(&conn, "cardinals", &args.cardinals, &[]) {
            Ok(_) => show_preview(&conn, "cardinals")?,
            Err(e) => warn!(source = %args.cardinals, "could not load cardinals table: {e:#}"),
        }
    } else {
        warn!(source = %args.cardinals, "no cardinals CSV; run the scraper first");
    }

    // ─── optional extra sources; skip quietly when absent ────────────
    for (table, source) in [
        ("conclaves", args.conclaves.as_deref()),
        ("papal_documents", args.documents.as_deref()),
    ] {
        let Some(source) = source else { continue };
        match duck::load_csv_table(&conn, table, source, &[]) {
            Ok(_) => show_preview(&conn, table)?,
            Err(e) => warn!(table, source, "could not load table: {e:#}"),
        }
    }

    info!("all done");
    Ok(())
}
