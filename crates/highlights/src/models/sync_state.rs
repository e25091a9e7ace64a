//! Sync checkpoint tracking for incremental Readwise sync

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted timestamp marking the end of the last successful sync window.
///
/// Stored separately from the article snapshot so a failed run can leave it
/// stale; the next run then re-fetches the affected window (the article merge
/// is idempotent on duplicate URLs, so re-fetching is safe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncCheckpoint {
    /// End of the last successfully completed sync window
    pub last_synced_at: DateTime<Utc>,
}

impl SyncCheckpoint {
    pub fn new(last_synced_at: DateTime<Utc>) -> Self {
        Self { last_synced_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialization() {
        let checkpoint =
            SyncCheckpoint::new(Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap());
        let json = serde_json::to_string(&checkpoint).unwrap();
        let deserialized: SyncCheckpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(checkpoint, deserialized);
    }

    #[test]
    fn test_single_timestamp_field() {
        let checkpoint = SyncCheckpoint::new(Utc::now());
        let value = serde_json::to_value(&checkpoint).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("last_synced_at"));
    }
}
