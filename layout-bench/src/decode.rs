//! Row decoding: bind the columns of a result row, in select order, to an
//! ordered list of typed destinations.
//!
//! Every read scenario goes through [`scan_row`]; only the destination list
//! (see [`Shape::slots`]) differs between them.

use crate::document::Document;
use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use perf_core::constants::DECODE_PROGRESS_INTERVAL;
use perf_core::types::{Record, FIELD_COUNT};
use rusqlite::{Connection, Row};
use std::io::{self, Write};

/// One destination for one selected column.
#[derive(Debug)]
pub enum Slot<'a> {
    Int(&'a mut i64),
    Text(&'a mut String),
    OptInt(&'a mut Option<i64>),
    OptTimestamp(&'a mut Option<NaiveDateTime>),
    /// A document column decoded straight into the aggregate.
    Record(&'a mut Record),
}

impl Slot<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Slot::Int(_) => "integer",
            Slot::Text(_) => "text",
            Slot::OptInt(_) => "nullable integer",
            Slot::OptTimestamp(_) => "nullable timestamp",
            Slot::Record(_) => "document",
        }
    }

    fn fill(&mut self, row: &Row<'_>, idx: usize) -> rusqlite::Result<()> {
        match self {
            Slot::Int(dst) => **dst = row.get(idx)?,
            Slot::Text(dst) => **dst = row.get(idx)?,
            Slot::OptInt(dst) => **dst = row.get(idx)?,
            Slot::OptTimestamp(dst) => **dst = row.get(idx)?,
            Slot::Record(dst) => **dst = row.get::<_, Document<Record>>(idx)?.into_inner(),
        }
        Ok(())
    }
}

/// Copy each column of `row` into the slot at the same position.
///
/// The row must have exactly as many columns as there are slots. A NULL
/// bound to a non-optional slot is an error.
pub fn scan_row(row: &Row<'_>, slots: &mut [Slot<'_>]) -> Result<()> {
    let columns = row.as_ref().column_count();
    if columns != slots.len() {
        bail!(
            "row has {columns} columns but {} destinations were provided",
            slots.len()
        );
    }
    for (idx, slot) in slots.iter_mut().enumerate() {
        slot.fill(row, idx)
            .with_context(|| format!("failed to decode column {idx} as {}", slot.kind()))?;
    }
    Ok(())
}

/// Projection shapes used by the read scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// One document column holding the whole record.
    Document,
    /// Every field as its own scalar column, in `FIELD_NAMES` order.
    AllFields,
    /// Only `id`.
    IdOnly,
}

impl Shape {
    pub fn column_count(self) -> usize {
        match self {
            Shape::Document | Shape::IdOnly => 1,
            Shape::AllFields => FIELD_COUNT,
        }
    }

    /// Destinations inside `record` for this shape, in select order.
    pub fn slots(self, record: &mut Record) -> Vec<Slot<'_>> {
        match self {
            Shape::Document => vec![Slot::Record(record)],
            Shape::IdOnly => vec![Slot::Int(&mut record.id)],
            Shape::AllFields => {
                let Record {
                    id,
                    name,
                    status,
                    last_updated_at,
                    last_modified_at,
                    num,
                    num2,
                    updated_at,
                    created_at,
                    jumbled_at,
                    secret_code,
                    entries,
                } = record;
                vec![
                    Slot::Int(id),
                    Slot::Text(name),
                    Slot::Text(status),
                    Slot::OptTimestamp(last_updated_at),
                    Slot::OptTimestamp(last_modified_at),
                    Slot::OptInt(num),
                    Slot::OptInt(num2),
                    Slot::OptTimestamp(updated_at),
                    Slot::OptTimestamp(created_at),
                    Slot::OptTimestamp(jumbled_at),
                    Slot::Text(secret_code),
                    Slot::Int(entries),
                ]
            }
        }
    }
}

/// A read query together with the shape its rows decode into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub sql: String,
    pub shape: Shape,
}

impl Projection {
    pub fn new(sql: impl Into<String>, shape: Shape) -> Self {
        Self {
            sql: sql.into(),
            shape,
        }
    }
}

/// Run `projection` and decode every row into a fresh [`Record`].
///
/// Prints a `.` to stderr for each decoded id that is a multiple of
/// [`DECODE_PROGRESS_INTERVAL`]; stdout is left to the timing lines.
pub fn read_records(conn: &Connection, projection: &Projection) -> Result<Vec<Record>> {
    let mut stmt = conn
        .prepare_cached(&projection.sql)
        .with_context(|| format!("failed to prepare `{}`", projection.sql))?;
    let selected = stmt.column_count();
    let expected = projection.shape.column_count();
    if selected != expected {
        bail!(
            "`{}` selects {selected} columns, {:?} rows need {expected}",
            projection.sql,
            projection.shape
        );
    }
    let mut rows = stmt
        .query([])
        .with_context(|| format!("failed to run `{}`", projection.sql))?;

    let mut records = Vec::new();
    let mut progress = io::stderr();
    while let Some(row) = rows.next()? {
        let mut record = Record::default();
        scan_row(row, &mut projection.shape.slots(&mut record))?;
        if record.id % DECODE_PROGRESS_INTERVAL == 0 {
            write!(progress, ".").context("failed to write progress marker")?;
        }
        records.push(record);
    }
    Ok(records)
}

/// Decode the whole result set and return the row count.
///
/// The decoded records stay alive until the count is taken so the decode
/// work cannot be optimized away.
pub fn decode_all(conn: &Connection, projection: &Projection) -> Result<usize> {
    let records = std::hint::black_box(read_records(conn, projection)?);
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn scan(conn: &Connection, sql: &str, shape: Shape) -> Result<Record> {
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let row = rows.next()?.context("no row")?;
        let mut record = Record::default();
        scan_row(row, &mut shape.slots(&mut record))?;
        Ok(record)
    }

    #[test]
    fn shapes_have_matching_slot_counts() {
        let mut record = Record::default();
        for shape in [Shape::Document, Shape::AllFields, Shape::IdOnly] {
            assert_eq!(shape.slots(&mut record).len(), shape.column_count());
        }
    }

    #[test]
    fn scalar_slots_decode_in_order() {
        let record = scan(
            &conn(),
            "SELECT 3, 'n', 's', '2024-01-02 03:04:05.5', NULL, 10, NULL,
                    NULL, NULL, NULL, 'c', 13",
            Shape::AllFields,
        )
        .unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.name, "n");
        assert_eq!(record.status, "s");
        assert_eq!(
            record.last_updated_at,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_milli_opt(3, 4, 5, 500)
        );
        assert_eq!(record.last_modified_at, None);
        assert_eq!(record.num, Some(10));
        assert_eq!(record.num2, None);
        assert_eq!(record.secret_code, "c");
        assert_eq!(record.entries, 13);
    }

    #[test]
    fn null_into_required_slot_fails() {
        let err = scan(&conn(), "SELECT NULL", Shape::IdOnly).unwrap_err();
        assert!(err.to_string().contains("integer"), "{err}");
    }

    #[test]
    fn column_count_mismatch_fails() {
        let err = scan(&conn(), "SELECT 1, 2", Shape::IdOnly).unwrap_err();
        assert!(err.to_string().contains("2 columns"), "{err}");
    }

    #[test]
    fn projection_wider_than_its_shape_is_rejected() {
        let projection = Projection::new("SELECT 1, 2", Shape::IdOnly);
        let err = read_records(&conn(), &projection).unwrap_err();
        assert!(err.to_string().contains("selects 2 columns"), "{err}");
    }

    #[test]
    fn document_slot_fills_whole_record() {
        let record = scan(
            &conn(),
            "SELECT json_object(
                'id', 9, 'name', 'a', 'status', 'b',
                'last_updated_at', NULL, 'last_modified_at', NULL,
                'num', NULL, 'num2', 2, 'updated_at', NULL, 'created_at', NULL,
                'jumbled_at', '2020-05-06T07:08:09', 'secret_code', 'c', 'entries', 19)",
            Shape::Document,
        )
        .unwrap();
        assert_eq!(record.id, 9);
        assert_eq!(record.num, None);
        assert_eq!(record.num2, Some(2));
        assert_eq!(
            record.jumbled_at,
            NaiveDate::from_ymd_opt(2020, 5, 6)
                .unwrap()
                .and_hms_opt(7, 8, 9)
        );
        assert_eq!(record.entries, 19);
    }

    #[test]
    fn decode_all_counts_rows() {
        let conn = conn();
        let projection = Projection::new(
            "WITH RECURSIVE n(id) AS (SELECT 1 UNION ALL SELECT id + 1 FROM n WHERE id < 25)
             SELECT id FROM n",
            Shape::IdOnly,
        );
        assert_eq!(decode_all(&conn, &projection).unwrap(), 25);
    }
}
