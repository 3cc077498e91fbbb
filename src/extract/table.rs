// src/extract/table.rs
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("invalid tr selector"));

/// One marked table, decomposed but not yet flattened.
#[derive(Debug)]
pub struct RawTable {
    /// Per-column header parts, outermost level first. Single-level headers
    /// hold one part per column.
    pub columns: Vec<Vec<String>>,
    /// Body rows in document order, exactly one cell string per column slot:
    /// ragged rows are padded or truncated to the header width. Rows whose
    /// `<tr>` carried no cells of its own are dropped here.
    pub rows: Vec<Vec<String>>,
    /// Inline `style` attribute of every body `<tr>`, dropped rows included.
    /// May therefore be longer than `rows`.
    pub row_styles: Vec<Option<String>>,
}

/// The site marks non-elector rows with this background color. External data
/// contract; both spellings must be matched verbatim (after normalization).
const INELIGIBLE_MARKERS: [&str; 2] = ["background:#ffcccc", "background-color:#ffcccc"];

/// Derive one eligibility flag per body row from its inline style: false when
/// the style carries either ineligible marker, true otherwise (including no
/// style at all). Matching is case-insensitive and ignores whitespace.
pub fn eligibility_flags(styles: &[Option<String>]) -> Vec<bool> {
    styles
        .iter()
        .map(|style| match style {
            Some(s) => {
                let norm: String = s
                    .to_lowercase()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                !INELIGIBLE_MARKERS.iter().any(|m| norm.contains(m))
            }
            None => true,
        })
        .collect()
}

/// Decompose a `<table>` element into a `RawTable`.
///
/// Leading rows whose cells are all `<th>` form the header (one or more
/// levels); if there is no such row the first row serves as the header
/// regardless. A table with no rows at all cannot be decomposed and errors.
pub fn parse_table(table: ElementRef) -> Result<RawTable, String> {
    let trs: Vec<ElementRef> = table.select(&TR).collect();
    if trs.is_empty() {
        return Err("table has no rows".into());
    }

    let mut header_count = trs
        .iter()
        .take_while(|tr| {
            let cells = row_cells(tr);
            !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th")
        })
        .count();
    if header_count == 0 {
        header_count = 1;
    }

    let header_grid = expand_grid(&trs[..header_count]);
    let width = header_grid.first().map(Vec::len).unwrap_or(0);
    let columns: Vec<Vec<String>> = (0..width)
        .map(|c| header_grid.iter().map(|row| row[c].clone()).collect())
        .collect();

    let body_trs = &trs[header_count..];
    let body_grid = expand_grid(body_trs);
    let mut rows = Vec::with_capacity(body_trs.len());
    let mut row_styles = Vec::with_capacity(body_trs.len());
    for (tr, mut grid_row) in body_trs.iter().zip(body_grid) {
        row_styles.push(tr.value().attr("style").map(str::to_string));
        if !row_cells(tr).is_empty() {
            // The header defines the column slots; a ragged row must not
            // shift values (or a later eligibility flag) into other columns.
            grid_row.resize(width, String::new());
            rows.push(grid_row);
        }
    }

    Ok(RawTable {
        columns,
        rows,
        row_styles,
    })
}

/// Direct `<th>`/`<td>` children of a row. Descendant selection would also
/// pick up cells of tables nested inside a cell.
fn row_cells<'a>(tr: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "th" | "td"))
        .collect()
}

/// Text content of a cell with internal whitespace collapsed.
fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Expand a run of `<tr>` elements into a rectangular grid of cell text,
/// repeating text across `colspan` and filling down across `rowspan`.
/// One output row per input `<tr>`; missing slots are empty strings.
fn expand_grid(trs: &[ElementRef]) -> Vec<Vec<String>> {
    let mut grid: Vec<Vec<Option<String>>> = vec![Vec::new(); trs.len()];

    for (r, tr) in trs.iter().enumerate() {
        let mut c = 0usize;
        for cell in row_cells(tr) {
            // Skip slots already claimed by a rowspan from an earlier row.
            while matches!(grid[r].get(c), Some(Some(_))) {
                c += 1;
            }
            let text = cell_text(&cell);
            let colspan = span_attr(&cell, "colspan");
            let rowspan = span_attr(&cell, "rowspan").min(trs.len() - r);
            for dr in 0..rowspan {
                for dc in 0..colspan {
                    let row = &mut grid[r + dr];
                    if row.len() <= c + dc {
                        row.resize(c + dc + 1, None);
                    }
                    row[c + dc] = Some(text.clone());
                }
            }
            c += colspan;
        }
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    grid.into_iter()
        .map(|row| {
            let mut row: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
            row.resize(width, String::new());
            row
        })
        .collect()
}

fn span_attr(cell: &ElementRef, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}
