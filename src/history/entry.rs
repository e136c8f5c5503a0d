use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::record::RecordKind;

/// One committed payload.
///
/// Serialized as `{"id", "kind", "payload", "createdAt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation time in milliseconds since the epoch; unique within a log.
    pub id: i64,
    pub kind: RecordKind,
    pub payload: String,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub created_at: String,
}

impl HistoryEntry {
    pub fn new(id: i64, kind: RecordKind, payload: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            payload: payload.into(),
            created_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parse `created_at` back into a timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
