//! The benchmark scenarios, one per (operation class, layout) pair.
//!
//! | Class       | Document layout                 | Typed-column layout |
//! |-------------|---------------------------------|---------------------|
//! | Insert      | `insert_document`               | `insert_columns`    |
//! | Update      | `update_document`               | `update_columns`    |
//! | Full read   | `read_document`, `read_extracted` | `read_columns`    |
//! | Narrow read | `read_document_id`              | `read_column_id`    |
//!
//! Inserts target the throwaway table, reset in `setup`. Updates and reads
//! target the seeded table. A scenario only exposes one iteration; the
//! caller owns how many iterations run and how they are timed.

use crate::decode::{decode_all, Projection};
use crate::schema::columns::ColumnLayout;
use crate::schema::jsonb::DocumentLayout;
use crate::schema::{reset_insert_table, StorageLayout};
use anyhow::{bail, Result};
use perf_core::constants::{INSERT_TABLE, SEED_TABLE, UPDATE_NAME_LABEL};
use perf_core::generator::generate_record;
use rusqlite::Connection;

/// Operation classes compared between the two layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    Insert,
    Update,
    FullRead,
    NarrowRead,
}

impl OperationClass {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationClass::Insert => "insert",
            OperationClass::Update => "update",
            OperationClass::FullRead => "full_read",
            OperationClass::NarrowRead => "narrow_read",
        }
    }

    pub fn is_write(self) -> bool {
        matches!(self, OperationClass::Insert | OperationClass::Update)
    }
}

/// One benchmark scenario.
pub trait Scenario {
    fn name(&self) -> &'static str;

    fn class(&self) -> OperationClass;

    /// Runs once before the timed iterations.
    fn setup(&self, _conn: &Connection) -> Result<()> {
        Ok(())
    }

    /// One timed iteration. `iteration` counts from zero within a run.
    fn run(&self, conn: &Connection, iteration: i64) -> Result<()>;

    /// Runs once after the last iteration, including after a failed one.
    fn teardown(&self, _conn: &Connection) -> Result<()> {
        Ok(())
    }
}

/// Insert `generate_record(n + 1)` into the freshly reset insert table.
pub struct InsertScenario<L> {
    name: &'static str,
    layout: L,
}

impl<L: StorageLayout> InsertScenario<L> {
    pub fn new(name: &'static str, layout: L) -> Self {
        Self { name, layout }
    }
}

impl<L: StorageLayout> Scenario for InsertScenario<L> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn class(&self) -> OperationClass {
        OperationClass::Insert
    }

    fn setup(&self, conn: &Connection) -> Result<()> {
        log::debug!("{}: resetting {INSERT_TABLE} for {} inserts", self.name, self.layout.name());
        reset_insert_table(conn)
    }

    fn run(&self, conn: &Connection, iteration: i64) -> Result<()> {
        let record = generate_record(iteration + 1);
        self.layout.insert(conn, INSERT_TABLE, &record)
    }
}

/// Set `name = "UpdateName:n"` and `num = n` on the seeded row `id = n + 1`.
///
/// An iteration whose row does not exist fails instead of timing a miss.
pub struct UpdateScenario<L> {
    name: &'static str,
    layout: L,
}

impl<L: StorageLayout> UpdateScenario<L> {
    pub fn new(name: &'static str, layout: L) -> Self {
        Self { name, layout }
    }
}

impl<L: StorageLayout> Scenario for UpdateScenario<L> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn class(&self) -> OperationClass {
        OperationClass::Update
    }

    fn run(&self, conn: &Connection, iteration: i64) -> Result<()> {
        let name = format!("{UPDATE_NAME_LABEL}:{iteration}");
        let id = iteration + 1;
        let changed = self
            .layout
            .update_name_and_num(conn, SEED_TABLE, id, &name, iteration)?;
        if changed == 0 {
            bail!(
                "{} update matched no row at id {id}, {SEED_TABLE} is too small",
                self.layout.name()
            );
        }
        Ok(())
    }
}

/// Select and decode every row of the seeded table through one projection.
pub struct ReadScenario {
    name: &'static str,
    class: OperationClass,
    projection: Projection,
}

impl ReadScenario {
    pub fn new(name: &'static str, class: OperationClass, projection: Projection) -> Self {
        Self {
            name,
            class,
            projection,
        }
    }
}

impl Scenario for ReadScenario {
    fn name(&self) -> &'static str {
        self.name
    }

    fn class(&self) -> OperationClass {
        self.class
    }

    fn run(&self, conn: &Connection, _iteration: i64) -> Result<()> {
        let rows = decode_all(conn, &self.projection)?;
        log::trace!("{}: decoded {rows} rows", self.name);
        Ok(())
    }

    fn teardown(&self, _conn: &Connection) -> Result<()> {
        // Ends the line of progress markers.
        eprintln!();
        Ok(())
    }
}

/// Every scenario, writes first, in a fixed order.
pub fn all_scenarios() -> Vec<Box<dyn Scenario>> {
    let document = DocumentLayout::new();
    let columns = ColumnLayout::new();

    vec![
        Box::new(InsertScenario::new("insert_document", DocumentLayout::new())),
        Box::new(InsertScenario::new("insert_columns", ColumnLayout::new())),
        Box::new(UpdateScenario::new("update_document", DocumentLayout::new())),
        Box::new(UpdateScenario::new("update_columns", ColumnLayout::new())),
        Box::new(ReadScenario::new(
            "read_document",
            OperationClass::FullRead,
            document.full_projection(SEED_TABLE),
        )),
        Box::new(ReadScenario::new(
            "read_columns",
            OperationClass::FullRead,
            columns.full_projection(SEED_TABLE),
        )),
        Box::new(ReadScenario::new(
            "read_extracted",
            OperationClass::FullRead,
            document.extracted_projection(SEED_TABLE),
        )),
        Box::new(ReadScenario::new(
            "read_document_id",
            OperationClass::NarrowRead,
            document.narrow_projection(SEED_TABLE),
        )),
        Box::new(ReadScenario::new(
            "read_column_id",
            OperationClass::NarrowRead,
            columns.narrow_projection(SEED_TABLE),
        )),
    ]
}

/// Scenarios whose name or class contains `filter` (all when `None`).
pub fn select_scenarios(filter: Option<&str>) -> Vec<Box<dyn Scenario>> {
    let mut scenarios = all_scenarios();
    if let Some(filter) = filter {
        let filter = filter.to_lowercase();
        scenarios.retain(|s| s.name().contains(&filter) || s.class().as_str().contains(&filter));
    }
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn nine_uniquely_named_scenarios() {
        let scenarios = all_scenarios();
        assert_eq!(scenarios.len(), 9);
        let names: HashSet<_> = scenarios.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn writes_come_before_reads() {
        let classes: Vec<bool> = all_scenarios().iter().map(|s| s.class().is_write()).collect();
        let first_read = classes.iter().position(|w| !w).unwrap();
        assert!(classes[..first_read].iter().all(|w| *w));
        assert!(classes[first_read..].iter().all(|w| !w));
    }

    #[test]
    fn filter_matches_names_and_classes() {
        let names = |f| {
            select_scenarios(Some(f))
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
        };
        assert_eq!(names("UPDATE"), vec!["update_document", "update_columns"]);
        assert_eq!(names("narrow"), vec!["read_document_id", "read_column_id"]);
        assert_eq!(names("extracted"), vec!["read_extracted"]);
        assert!(names("nothing-matches").is_empty());
        assert_eq!(select_scenarios(None).len(), 9);
    }
}
