//! Typed-column layout: one appropriately typed column per record field.

use super::StorageLayout;
use crate::decode::{Projection, Shape};
use anyhow::{Context, Result};
use perf_core::types::{Record, FIELD_NAMES};
use rusqlite::{params, Connection};

pub struct ColumnLayout;

impl ColumnLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageLayout for ColumnLayout {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn insert(&self, conn: &Connection, table: &str, record: &Record) -> Result<()> {
        let mut stmt = conn.prepare_cached(&format!(
            "INSERT INTO {table} (
                id, name, status, last_updated_at, last_modified_at,
                num, num2, updated_at, created_at, jumbled_at, secret_code, entries
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ))?;
        stmt.execute(params![
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
        ])
        .with_context(|| format!("failed to insert row {}", record.id))?;
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
        let mut stmt =
            conn.prepare_cached(&format!("UPDATE {table} SET name = ?1, num = ?2 WHERE id = ?3"))?;
        let changed = stmt
            .execute(params![name, num, id])
            .with_context(|| format!("failed to update row {id}"))?;
        Ok(changed)
    }

    fn full_projection(&self, table: &str) -> Projection {
        Projection::new(
            format!("SELECT {} FROM {table}", FIELD_NAMES.join(", ")),
            Shape::AllFields,
        )
    }

    fn narrow_projection(&self, table: &str) -> Projection {
        Projection::new(format!("SELECT id FROM {table}"), Shape::IdOnly)
    }
}
