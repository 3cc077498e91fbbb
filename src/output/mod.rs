// src/output/mod.rs
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::extract::Dataset;

/// Where the flattened cardinals dataset lands.
pub const OUTPUT_FILE: &str = "current_cardinals.csv";

/// Serialize a [`Dataset`] to CSV at `path`: one header row of normalized
/// column names, then every record in order. All values are written as
/// strings; `eligible` appears as `true`/`false`.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create CSV at {}", path.display()))?;

    // An empty dataset has no columns; the csv crate rejects empty records.
    if !dataset.columns.is_empty() {
        wtr.write_record(&dataset.columns)?;
        for row in &dataset.rows {
            wtr.write_record(row)?;
        }
    }
    wtr.flush()
        .with_context(|| format!("failed to flush CSV at {}", path.display()))?;

    info!(path = %path.display(), rows = dataset.rows.len(), "wrote dataset");
    Ok(())
}
