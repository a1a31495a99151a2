//! Domain models for indexed webhook records.
//!
//! Records are append-only: once a payload is written it is never mutated
//! or deleted by this service. The database owns the identifier and the
//! received timestamp.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Strongly-typed identifier for an indexed record.
///
/// Wraps the `BIGSERIAL` primary key assigned by PostgreSQL. Handler code
/// never chooses record IDs; they only flow back out of inserts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One persisted webhook payload.
///
/// `data` holds the canonical JSON text of the payload exactly as it was
/// re-serialized at intake time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IndexedRecord {
    /// Database-assigned identifier.
    pub id: RecordId,

    /// Canonical JSON text of the received payload.
    pub data: String,

    /// When the database accepted the row.
    pub created_at: DateTime<Utc>,
}

impl IndexedRecord {
    /// Parses the stored text back into a JSON value.
    pub fn payload(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_displays_as_plain_integer() {
        assert_eq!(RecordId(42).to_string(), "42");
    }

    #[test]
    fn stored_text_round_trips_to_payload() {
        let record = IndexedRecord {
            id: RecordId(1),
            data: r#"{"event":"ping"}"#.to_string(),
            created_at: Utc::now(),
        };

        let payload = record.payload().expect("stored text is valid JSON");
        assert_eq!(payload["event"], "ping");
    }

    #[test]
    fn corrupt_stored_text_is_an_invalid_payload_error() {
        let record =
            IndexedRecord { id: RecordId(1), data: "{broken".to_string(), created_at: Utc::now() };

        assert!(record.payload().is_err());
    }
}
