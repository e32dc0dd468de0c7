//! Structured-document column codec.
//!
//! Documents travel as JSON text: writers wrap the parameter in `jsonb(?)` so
//! the column stores SQLite's binary JSON, readers select `json(j)` to get the
//! text back.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A value stored as one document column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<T>(pub T);

impl<T> Document<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> ToSql for Document<T> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = serde_json::to_string(&self.0)
            .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
        Ok(ToSqlOutput::from(text))
    }
}

impl<T: DeserializeOwned> FromSql for Document<T> {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => serde_json::from_slice(bytes)
                .map(Document)
                .map_err(|err| FromSqlError::Other(Box::new(err))),
            // Raw JSONB blobs and NULLs are not documents we can decode.
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
