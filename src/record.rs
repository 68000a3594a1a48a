//! Memory record data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a stored memory record.
///
/// Ids are assigned by the record store, monotonically increasing in
/// insertion order, and stable for the lifetime of the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single stored memory: one unit of past interaction content plus its
/// embedding and timestamps.
///
/// Records are immutable once written, except for `last_accessed`, which
/// the engine stamps on retrieval hits when recency-of-access decay is
/// configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub embedding: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Input to `RecordStore::put`.
///
/// The store always assigns the id; the timestamp is caller-settable and
/// defaults to the current wall-clock time when unset.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub content: String,
    pub embedding: Vec<f32>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RecordDraft {
    /// Create a draft with no explicit timestamp.
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            content: content.into(),
            embedding,
            timestamp: None,
        }
    }

    /// Create a draft stamped with an explicit creation time.
    pub fn with_timestamp(
        content: impl Into<String>,
        embedding: Vec<f32>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            embedding,
            timestamp: Some(timestamp),
        }
    }
}

/// A memory surfaced by `recall`, carrying its decayed relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecalledMemory {
    /// Id of the underlying record.
    pub id: RecordId,
    /// Stored interaction text.
    pub content: String,
    /// Decayed relevance score in [0, 100].
    pub score: f64,
    /// Creation time of the underlying record.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId(42).to_string(), "42");
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = MemoryRecord {
            id: RecordId(7),
            timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
            content: "test content".to_string(),
            embedding: vec![0.25, -0.5, 1.0],
            last_accessed: None,
        };

        let line = serde_json::to_string(&record).unwrap();
        let recovered: MemoryRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(recovered, record);
    }

    #[test]
    fn test_last_accessed_omitted_when_none() {
        let record = MemoryRecord {
            id: RecordId(1),
            timestamp: Utc::now(),
            content: "x".to_string(),
            embedding: vec![1.0],
            last_accessed: None,
        };

        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains("last_accessed"));
    }

    #[test]
    fn test_last_accessed_defaults_on_old_lines() {
        // Lines written before an access stamp existed must still parse.
        let line = r#"{"id":3,"timestamp":"2024-01-01T00:00:00Z","content":"c","embedding":[0.5]}"#;
        let record: MemoryRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.last_accessed, None);
    }
}
