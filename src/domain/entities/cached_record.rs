use crate::domain::value_objects::{Collection, Payload, RecordId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last known full value of a remote record, held locally for offline reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedRecord {
    pub id: RecordId,
    pub collection: Collection,
    pub user_id: UserId,
    pub data: Payload,
    pub cached_at: DateTime<Utc>,
}

impl CachedRecord {
    pub fn new(
        id: RecordId,
        collection: Collection,
        user_id: UserId,
        data: Payload,
        cached_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            collection,
            user_id,
            data,
            cached_at,
        }
    }
}
