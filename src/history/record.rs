//! History record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Unique identifier within the collection.
    pub id: String,

    /// Prompt as sent, including any template hint.
    pub prompt: String,

    /// Full model reply.
    pub content: String,

    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl HistoryRecord {
    /// Create a record stamped with the current time.
    #[must_use]
    pub fn new(prompt: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.to_string(),
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Creation time as a `DateTime`.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Insert `record` at the front and evict the oldest beyond `max_entries`.
///
/// At least one record is always kept.
pub(crate) fn push_capped(records: &mut Vec<HistoryRecord>, record: HistoryRecord, max_entries: usize) {
    records.insert(0, record);
    records.truncate(max_entries.max(1));
}
