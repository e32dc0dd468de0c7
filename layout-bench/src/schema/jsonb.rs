//! Document layout: the whole record in one JSONB column `j`.
//!
//! Writes serialize the record and let SQLite convert it with `jsonb()`.
//! Partial updates patch the stored document in place with `jsonb_set`, and
//! reads either decode the document whole or pull single fields out of it
//! with `->>` plus an explicit cast.

use super::StorageLayout;
use crate::decode::{Projection, Shape};
use crate::document::Document;
use anyhow::{Context, Result};
use perf_core::types::Record;
use rusqlite::{params, Connection};

/// Server-side coercion applied to extracted timestamps, at millisecond
/// precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%f";

/// Length of `YYYY-MM-DDTHH:MM:SS.sss`. The stored text is cut to this before
/// `strftime` sees it: SQLite rounds extra sub-millisecond digits, and a
/// round-up in the last half millisecond of a day lands on the next date.
const MILLIS_PREFIX_LEN: usize = 23;

pub struct DocumentLayout;

impl DocumentLayout {
    pub fn new() -> Self {
        Self
    }

    /// Every field extracted from the document at query time, cast to its
    /// scalar type, in `FIELD_NAMES` order.
    pub fn extracted_projection(&self, table: &str) -> Projection {
        let ts = |field: &str| {
            format!("strftime('{TIMESTAMP_FORMAT}', substr(j->>'{field}', 1, {MILLIS_PREFIX_LEN}))")
        };
        Projection::new(
            format!(
                "SELECT
                    CAST(j->>'id' AS INTEGER),
                    j->>'name',
                    j->>'status',
                    {},
                    {},
                    CAST(j->>'num' AS INTEGER),
                    CAST(j->>'num2' AS INTEGER),
                    {},
                    {},
                    {},
                    j->>'secret_code',
                    CAST(j->>'entries' AS INTEGER)
                 FROM {table}",
                ts("last_updated_at"),
                ts("last_modified_at"),
                ts("updated_at"),
                ts("created_at"),
                ts("jumbled_at"),
            ),
            Shape::AllFields,
        )
    }
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageLayout for DocumentLayout {
    fn name(&self) -> &'static str {
        "document"
    }

    fn insert(&self, conn: &Connection, table: &str, record: &Record) -> Result<()> {
        let mut stmt = conn.prepare_cached(&format!("INSERT INTO {table} (j) VALUES (jsonb(?1))"))?;
        stmt.execute([Document(record)])
            .with_context(|| format!("failed to insert document {}", record.id))?;
        Ok(())
    }

    fn update_name_and_num(
        &self,
        conn: &Connection,
        table: &str,
        id: i64,
        name: &str,
        num: i64,
    ) -> Result<usize> {
        let mut stmt = conn.prepare_cached(&format!(
            "UPDATE {table} SET j = jsonb_set(j, '$.name', ?1, '$.num', ?2) WHERE id = ?3"
        ))?;
        let changed = stmt
            .execute(params![name, num, id])
            .with_context(|| format!("failed to patch document {id}"))?;
        Ok(changed)
    }

    fn full_projection(&self, table: &str) -> Projection {
        Projection::new(format!("SELECT json(j) FROM {table}"), Shape::Document)
    }

    fn narrow_projection(&self, table: &str) -> Projection {
        Projection::new(
            format!("SELECT CAST(j->>'id' AS INTEGER) FROM {table}"),
            Shape::IdOnly,
        )
    }
}
