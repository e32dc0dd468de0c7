//! Synthetic record generation.
//!
//! Every field is derived from the index, so a record can be regenerated and
//! compared against whatever a read path decoded for the same id.

use crate::constants::{CODE_LABEL, ENTRIES_OFFSET, NAME_LABEL, NUM_OFFSET, STATUS_LABEL};
use crate::types::Record;
use chrono::{NaiveDateTime, Utc};

/// Build the record for index `i`, stamping every timestamp with "now".
pub fn generate_record(i: i64) -> Record {
    generate_record_at(i, Utc::now().naive_utc())
}

/// Build the record for index `i` with an explicit generation instant.
///
/// Derived integers wrap on overflow, so every `i64` index is valid.
pub fn generate_record_at(i: i64, now: NaiveDateTime) -> Record {
    let num = i.wrapping_add(NUM_OFFSET);
    Record {
        id: i,
        name: format!("{NAME_LABEL}:{i}"),
        status: format!("{STATUS_LABEL}:{i}"),
        last_updated_at: Some(now),
        last_modified_at: Some(now),
        num: Some(num),
        num2: Some(num),
        updated_at: Some(now),
        created_at: Some(now),
        jumbled_at: Some(now),
        secret_code: format!("{CODE_LABEL}:{i}"),
        entries: i.wrapping_add(ENTRIES_OFFSET),
    }
}
