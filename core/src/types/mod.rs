//! Data types shared across the workspace.

mod record;

pub use record::{Record, FIELD_COUNT, FIELD_NAMES};
