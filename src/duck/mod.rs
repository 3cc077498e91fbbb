// src/duck/mod.rs
use anyhow::{Context, Result};
use duckdb::{params, Connection};
use tracing::info;

/// The persistent analytical database file.
pub const DB_FILE: &str = "papal_data.duckdb";

/// Historical roster of office holders, St. Peter through Francis.
pub const POPES_CSV_URL: &str =
    "https://raw.githubusercontent.com/ksreyes/popes/master/popes.csv";

/// Open a DuckDB database on disk at `path`, creating the file if it doesn't exist.
pub fn open_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open DuckDB database at {path}"))?;
    Ok(conn)
}

/// Open a DuckDB in-memory database.
pub fn open_mem_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    Ok(conn)
}

/// Idempotently (re)create `table` from a CSV source, which may be a local
/// path or a URL DuckDB can reach. `null_strs` are treated as SQL NULL.
/// Returns the loaded row count.
pub fn load_csv_table(
    conn: &Connection,
    table: &str,
    source: &str,
    null_strs: &[&str],
) -> Result<usize> {
    let source = source.replace('\'', "''");
    let sql = if null_strs.is_empty() {
        format!("CREATE OR REPLACE TABLE {table} AS SELECT * FROM read_csv('{source}');")
    } else {
        let nulls = null_strs
            .iter()
            .map(|s| format!("'{}'", s.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE OR REPLACE TABLE {table} AS \
             SELECT * FROM read_csv('{source}', nullstr=[{nulls}]);"
        )
    };
    conn.execute_batch(&sql)
        .with_context(|| format!("failed to load {source} into table {table}"))?;

    let count = count_rows(conn, table)?;
    info!(table, %source, rows = count, "loaded CSV table");
    Ok(count)
}

/// (Re)create the `popes` table from the roster CSV, cleaning on the fly:
/// the reserved `end` column is quoted and renamed, `NA` becomes NULL, and
/// the date columns are cast to DuckDB's native DATE type.
pub fn load_popes_table(conn: &Connection, source: &str) -> Result<usize> {
    let sql = format!(
        "CREATE OR REPLACE TABLE popes AS
         SELECT
             number,
             name_full,
             name,
             suffix,
             canonization,
             CAST(birth AS DATE) AS birth_date,
             CAST(start AS DATE) AS reign_start,
             CAST(\"end\" AS DATE) AS reign_end,
             age_start,
             age_end,
             tenure
         FROM read_csv('{}', nullstr=['NA']);",
        source.replace('\'', "''"),
    );
    conn.execute_batch(&sql)
        .with_context(|| format!("failed to load popes roster from {source}"))?;

    let count = count_rows(conn, "popes")?;
    info!(source, rows = count, "loaded popes table");
    Ok(count)
}

/// Corrective update by name match: close out a reign on `end_date`
/// (YYYY-MM-DD), recording the final age and recomputing tenure in years.
/// Returns the number of rows updated (0 when no name matches).
pub fn close_reign(conn: &Connection, name: &str, end_date: &str, age_end: i64) -> Result<usize> {
    let updated = conn.execute(
        "UPDATE popes
         SET reign_end = CAST(? AS DATE),
             age_end = ?,
             tenure = CAST(CAST(? AS DATE) - reign_start AS DOUBLE) / 365.25
         WHERE name = ?;",
        params![end_date, age_end, end_date, name],
    )?;
    info!(name, end_date, updated, "closed reign");
    Ok(updated)
}

/// Column names of `table`, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("DESCRIBE {table};"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// First `limit` rows of `table` with every value rendered as text (NULL
/// becomes the empty string), plus the column names, for tabular previews.
pub fn preview(
    conn: &Connection,
    table: &str,
    limit: usize,
) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let columns = table_columns(conn, table)?;
    let width = columns.len();

    // COLUMNS(*)::VARCHAR casts every column to text on the database side.
    let sql = format!("SELECT COLUMNS(*)::VARCHAR FROM (SELECT * FROM {table} LIMIT {limit});");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut records: Vec<Vec<String>> = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Vec::with_capacity(width);
        for i in 0..width {
            let value: Option<String> = row.get(i)?;
            record.push(value.unwrap_or_default());
        }
        records.push(record);
    }
    Ok((columns, records))
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |r| r.get(0))?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;

    const ROSTER: &str = "\
number,name_full,name,suffix,canonization,birth,start,end,age_start,age_end,tenure
265,Benedictus XVI,Benedict XVI,XVI,,1927-04-16,2005-04-19,2013-02-28,78,85,7.86
266,Franciscus,Francis,,,1936-12-17,2013-03-13,NA,76,NA,NA
";

    fn roster_file() -> Result<tempfile::NamedTempFile> {
        let mut f = tempfile::NamedTempFile::new()?;
        f.write_all(ROSTER.as_bytes())?;
        f.flush()?;
        Ok(f)
    }

    #[test]
    fn popes_load_cleans_na_and_casts_dates() -> Result<()> {
        let f = roster_file()?;
        let conn = open_mem_db()?;
        let n = load_popes_table(&conn, f.path().to_str().unwrap())?;
        assert_eq!(n, 2);

        // NA reign_end became NULL; birth survived the DATE cast.
        let (open_reigns, birth): (i64, String) = conn.query_row(
            "SELECT COUNT(*) FILTER (WHERE reign_end IS NULL),
                    MIN(birth_date)::VARCHAR
             FROM popes;",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        assert_eq!(open_reigns, 1);
        assert_eq!(birth, "1927-04-16");
        Ok(())
    }

    #[test]
    fn close_reign_updates_only_the_matching_row() -> Result<()> {
        let f = roster_file()?;
        let conn = open_mem_db()?;
        load_popes_table(&conn, f.path().to_str().unwrap())?;

        let updated = close_reign(&conn, "Francis", "2025-04-21", 88)?;
        assert_eq!(updated, 1);

        let (end, age, tenure): (String, i64, f64) = conn.query_row(
            "SELECT reign_end::VARCHAR, age_end, tenure FROM popes WHERE name = 'Francis';",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )?;
        assert_eq!(end, "2025-04-21");
        assert_eq!(age, 88);
        assert!((tenure - 12.1).abs() < 0.1, "tenure was {tenure}");

        // Benedict untouched.
        let benedict_age: i64 = conn.query_row(
            "SELECT age_end FROM popes WHERE name = 'Benedict XVI';",
            [],
            |r| r.get(0),
        )?;
        assert_eq!(benedict_age, 85);

        // And a name that matches nothing updates nothing.
        assert_eq!(close_reign(&conn, "Nobody", "2025-04-21", 1)?, 0);
        Ok(())
    }

    #[test]
    fn generic_csv_load_is_idempotent() -> Result<()> {
        let mut f = tempfile::NamedTempFile::new()?;
        writeln!(f, "name,country,eligible")?;
        writeln!(f, "Pietro Parolin,Italy,true")?;
        writeln!(f, "Angelo Sodano,Italy,false")?;
        f.flush()?;
        let path = f.path().to_str().unwrap().to_string();

        let conn = open_mem_db()?;
        assert_eq!(load_csv_table(&conn, "cardinals", &path, &[])?, 2);
        // CREATE OR REPLACE: a second load replaces rather than appends.
        assert_eq!(load_csv_table(&conn, "cardinals", &path, &[])?, 2);
        Ok(())
    }

    #[test]
    fn preview_renders_strings_and_respects_limit() -> Result<()> {
        let f = roster_file()?;
        let conn = open_mem_db()?;
        load_popes_table(&conn, f.path().to_str().unwrap())?;

        let (columns, rows) = preview(&conn, "popes", 1)?;
        assert_eq!(columns.len(), 11);
        assert_eq!(columns[0], "number");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][2], "Benedict XVI");

        // NULLs render as empty strings.
        let (_, all) = preview(&conn, "popes", 5)?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1][7], "", "Francis has no reign_end yet");
        Ok(())
    }
}
