//! Seeding: fills the long-lived table that every read scenario scans.
//!
//! Each row carries the record twice, once as the JSONB document and once as
//! typed columns, so both read paths see one consistent population.

use crate::document::Document;
use crate::schema::{create_seed_table, row_count};
use anyhow::{bail, Context, Result};
use perf_core::constants::{SEED_PROGRESS_INTERVAL, SEED_TABLE};
use perf_core::generator::generate_record;
use perf_core::types::Record;
use rusqlite::{params, Connection};
use std::time::{Duration, Instant};

/// Outcome of a completed seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStats {
    pub rows: u64,
    pub elapsed: Duration,
}

/// Insert `record` into `table` as a document plus mirrored typed columns.
pub fn insert_mirrored(conn: &Connection, table: &str, record: &Record) -> Result<()> {
    let mut stmt = conn.prepare_cached(&format!(
        "INSERT INTO {table} (
            j, id, name, status, last_updated_at, last_modified_at, num, num2,
            updated_at, created_at, jumbled_at, secret_code, entries
        ) VALUES (jsonb(?1), ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
    ))?;
    stmt.execute(params![
        Document(record),
        record.id,
        record.name,
        record.status,
        record.last_updated_at,
        record.last_modified_at,
        record.num,
        record.num2,
        record.updated_at,
        record.created_at,
        record.jumbled_at,
        record.secret_code,
        record.entries,
    ])?;
    Ok(())
}

/// Create the seeded table if needed and write records `0..rows` into it.
///
/// Refuses a table that already holds rows, so ids stay unique. Prints the
/// current index to stderr every [`SEED_PROGRESS_INTERVAL`] rows. Stops at
/// the first failed insert; rows written before it stay in place.
pub fn seed(conn: &Connection, rows: u64) -> Result<SeedStats> {
    create_seed_table(conn)?;
    let existing = row_count(conn, SEED_TABLE)?;
    if existing > 0 {
        bail!("{SEED_TABLE} already holds {existing} rows, use a fresh database to reseed");
    }

    let start = Instant::now();
    for i in 0..rows {
        if i % SEED_PROGRESS_INTERVAL == 0 {
            eprintln!("{i}");
            log::debug!("seeding {SEED_TABLE}: {i}/{rows}");
        }
        let id = i64::try_from(i).context("seed index out of range")?;
        let record = generate_record(id);
        insert_mirrored(conn, SEED_TABLE, &record)
            .with_context(|| format!("failed to seed row {i} into {SEED_TABLE}"))?;
    }

    let stats = SeedStats {
        rows,
        elapsed: start.elapsed(),
    };
    log::info!(
        "seeded {} rows into {SEED_TABLE} in {:.2}s",
        stats.rows,
        stats.elapsed.as_secs_f64()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::open_connection;

    #[test]
    fn zero_rows_still_creates_the_table() {
        let conn = open_connection(":memory:").unwrap();
        let stats = seed(&conn, 0).unwrap();
        assert_eq!(stats.rows, 0);
        assert_eq!(row_count(&conn, SEED_TABLE).unwrap(), 0);
    }

    #[test]
    fn failed_insert_aborts_seeding() {
        let conn = open_connection(":memory:").unwrap();
        create_seed_table(&conn).unwrap();
        conn.execute_batch(&format!(
            "CREATE TRIGGER reject_five BEFORE INSERT ON {SEED_TABLE}
             WHEN NEW.id = 5 BEGIN SELECT RAISE(ABORT, 'rejected'); END;"
        ))
        .unwrap();

        let err = seed(&conn, 10).unwrap_err();
        assert!(format!("{err:#}").contains("row 5"), "{err:#}");
        assert_eq!(row_count(&conn, SEED_TABLE).unwrap(), 5);
    }
}
