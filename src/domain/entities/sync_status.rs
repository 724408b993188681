use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a user's outstanding local mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncStatusSnapshot {
    pub has_pending: bool,
    pub count: u64,
    pub oldest_created_at: Option<DateTime<Utc>>,
}

impl SyncStatusSnapshot {
    pub fn new(count: u64, oldest_created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            has_pending: count > 0,
            count,
            oldest_created_at,
        }
    }
}
