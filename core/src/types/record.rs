use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of logical fields in a [`Record`].
pub const FIELD_COUNT: usize = 12;

/// Field names in canonical order. Document keys and typed column names both
/// use these, and every full projection selects them in this order.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "id",
    "name",
    "status",
    "last_updated_at",
    "last_modified_at",
    "num",
    "num2",
    "updated_at",
    "created_at",
    "jumbled_at",
    "secret_code",
    "entries",
];

/// The synthetic entity stored under both layouts.
///
/// Timestamps are wall-clock instants without a time zone (UTC by
/// convention). The optional fields are nullable in storage even though the
/// generator always fills them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub last_updated_at: Option<NaiveDateTime>,
    pub last_modified_at: Option<NaiveDateTime>,
    pub num: Option<i64>,
    pub num2: Option<i64>,
    pub updated_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub jumbled_at: Option<NaiveDateTime>,
    pub secret_code: String,
    pub entries: i64,
}

impl Record {
    /// The five timestamp fields, in `FIELD_NAMES` order.
    pub fn timestamps(&self) -> [Option<NaiveDateTime>; 5] {
        [
            self.last_updated_at,
            self.last_modified_at,
            self.updated_at,
            self.created_at,
            self.jumbled_at,
        ]
    }

    /// A copy with every timestamp cleared, for comparing the remaining
    /// fields of records read through paths of different time precision.
    pub fn without_timestamps(&self) -> Self {
        Self {
            last_updated_at: None,
            last_modified_at: None,
            updated_at: None,
            created_at: None,
            jumbled_at: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_nano_opt(10, 11, 12, 345_678_901)
            .unwrap()
    }

    #[test]
    fn document_keys_follow_field_names() {
        let record = Record {
            id: 1,
            last_updated_at: Some(instant()),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        let mut actual: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        actual.sort_unstable();
        let mut expected = FIELD_NAMES.to_vec();
        expected.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[test]
    fn unset_optionals_serialize_as_null() {
        let value = serde_json::to_value(Record::default()).unwrap();
        assert!(value["num"].is_null());
        assert!(value["jumbled_at"].is_null());
        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, Record::default());
    }

    #[test]
    fn without_timestamps_keeps_other_fields() {
        let record = Record {
            id: 3,
            name: "n".into(),
            num: Some(10),
            created_at: Some(instant()),
            ..Default::default()
        };
        assert_eq!(record.timestamps()[3], Some(instant()));

        let stripped = record.without_timestamps();
        assert_eq!(stripped.timestamps(), [None; 5]);
        assert_eq!(stripped.id, 3);
        assert_eq!(stripped.name, "n");
        assert_eq!(stripped.num, Some(10));
    }
}
