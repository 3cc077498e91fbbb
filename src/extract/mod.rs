// src/extract/mod.rs
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::error::ScrapeError;

pub mod flatten;
pub mod table;

pub use flatten::{flatten_name, flatten_parts};
pub use table::{eligibility_flags, parse_table, RawTable};

/// The class the source site puts on styled data tables. Tables without it
/// are ignored wholesale.
static MARKED_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.wikitable").expect("invalid wikitable selector"));

/// All tables' records concatenated, with normalized column names.
///
/// `columns` is the union of every table's flattened names in first-seen
/// order; each row is aligned to it, holding the empty string for columns its
/// source table lacked.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append one table's records, widening the column union as needed.
    fn append_table(&mut self, columns: &[String], rows: Vec<Vec<String>>) {
        let mut slots = Vec::with_capacity(columns.len());
        for name in columns {
            let slot = match self.columns.iter().position(|c| c == name) {
                Some(i) => i,
                None => {
                    self.columns.push(name.clone());
                    // Widen rows already stored; they have no value here.
                    for row in &mut self.rows {
                        row.push(String::new());
                    }
                    self.columns.len() - 1
                }
            };
            slots.push(slot);
        }
        for row in rows {
            let mut aligned = vec![String::new(); self.columns.len()];
            for (value, &slot) in row.into_iter().zip(&slots) {
                aligned[slot] = value;
            }
            self.rows.push(aligned);
        }
    }
}

/// Extract every marked table from `html` into one flat [`Dataset`].
///
/// Tables appear in document order, each contributing its body rows in
/// document order. Each table gets an `eligible` column derived from row
/// styling, unless the derived flag count disagrees with the parsed row
/// count, in which case that table's `eligible` column is omitted entirely.
/// Zero marked tables is not an error; a table that cannot be decomposed at
/// all aborts the whole extraction.
pub fn extract_dataset(html: &str) -> Result<Dataset, ScrapeError> {
    let doc = Html::parse_document(html);
    let mut dataset = Dataset::default();
    let mut tables = 0usize;

    for (index, element) in doc.select(&MARKED_TABLE).enumerate() {
        let raw = parse_table(element).map_err(|reason| ScrapeError::Parse { index, reason })?;

        let mut columns: Vec<String> = raw.columns.iter().map(|p| flatten_parts(p)).collect();
        let mut rows = raw.rows;

        let flags = eligibility_flags(&raw.row_styles);
        if flags.len() == rows.len() {
            columns.push("eligible".to_string());
            for (row, flag) in rows.iter_mut().zip(&flags) {
                row.push(flag.to_string());
            }
        } else {
            warn!(
                table = index,
                flags = flags.len(),
                rows = rows.len(),
                "eligibility flag count mismatch; omitting eligible column"
            );
        }

        debug!(table = index, rows = rows.len(), "parsed marked table");
        dataset.append_table(&columns, rows);
        tables += 1;
    }

    info!(tables, rows = dataset.rows.len(), "extraction complete");
    Ok(dataset)
}
