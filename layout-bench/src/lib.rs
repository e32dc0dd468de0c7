//! Storage layout benchmark: document column vs typed columns.
//!
//! Measures what it costs to keep a record in one JSONB column instead of one
//! typed column per field, across four operation classes:
//! - bulk insert
//! - partial update of two fields
//! - full-row read and decode
//! - narrow (id only) read and decode
//!
//! Run once: `layout-bench seed`, then `layout-bench bench`.
//! Calibrated timings: `cargo bench`. Tests: `cargo test`.

pub mod config;
pub mod decode;
pub mod document;
pub mod report;
pub mod runner;
pub mod schema;
pub mod seed;
pub mod suite;
