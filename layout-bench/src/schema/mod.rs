//! Table definitions, connection setup and the common `StorageLayout` trait.
//!
//! Two layouts are provided:
//! - [`jsonb::DocumentLayout`]: the whole record in one JSONB column `j`
//! - [`columns::ColumnLayout`]: one typed column per field
//!
//! Both tables carry both representations; a layout only decides which of
//! them its statements touch.

pub mod columns;
pub mod jsonb;

use crate::decode::Projection;
use anyhow::{Context, Result};
use perf_core::constants::{INSERT_TABLE, SEED_TABLE};
use perf_core::types::Record;
use rusqlite::Connection;

/// Trait implemented by each storage layout (document vs typed columns).
///
/// Each method is one statement class exercised by the benchmark suite.
/// Implementations use cached prepared statements.
pub trait StorageLayout {
    /// Short name used in scenario names.
    fn name(&self) -> &'static str;

    /// Insert one record into `table`, writing only this layout's columns.
    fn insert(&self, conn: &Connection, table: &str, record: &Record) -> Result<()>;

    /// Set `name` and `num` on the row with the given `id`, leaving every
    /// other field alone. Returns the number of rows changed.
    fn update_name_and_num(
        &self,
        conn: &Connection,
        table: &str,
        id: i64,
        name: &str,
        num: i64,
    ) -> Result<usize>;

    /// Every field of every row.
    fn full_projection(&self, table: &str) -> Projection;

    /// Only `id` of every row.
    fn narrow_projection(&self, table: &str) -> Projection;
}

/// DDL for a table of the benchmark shape. Timestamps are ISO-8601 text.
fn table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            j                   BLOB,
            id                  INTEGER,
            name                TEXT,
            status              TEXT,
            last_updated_at     TEXT,
            last_modified_at    TEXT,
            num                 INTEGER,
            num2                INTEGER,
            updated_at          TEXT,
            created_at          TEXT,
            jumbled_at          TEXT,
            secret_code         TEXT,
            entries             INTEGER
        );"
    )
}

/// Create the long-lived seeded table and its `id` index if missing.
pub fn create_seed_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "{}
         CREATE INDEX IF NOT EXISTS idx_{SEED_TABLE}_id ON {SEED_TABLE}(id);",
        table_ddl(SEED_TABLE)
    ))
    .with_context(|| format!("failed to create table {SEED_TABLE}"))
}

/// Drop and recreate the throwaway insert table.
pub fn reset_insert_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS {INSERT_TABLE};
         {}",
        table_ddl(INSERT_TABLE)
    ))
    .with_context(|| format!("failed to reset table {INSERT_TABLE}"))
}

/// Row count of `table`.
pub fn row_count(conn: &Connection, table: &str) -> Result<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok(count)
}

/// Open the database named by a connection string and configure it.
///
/// Accepts a plain path, a `file:` URI, `sqlite://<path>` or `:memory:`.
pub fn open_connection(url: &str) -> Result<Connection> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let conn = if path == ":memory:" {
        Connection::open_in_memory()
    } else {
        Connection::open(path)
    }
    .with_context(|| format!("unable to connect to database {url}"))?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Configure a connection for benchmark throughput over durability.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = OFF;
         PRAGMA cache_size = -131072;
         PRAGMA mmap_size = 268435456;
         PRAGMA temp_store = MEMORY;",
    )?;
    Ok(())
}
