use crate::domain::value_objects::{Collection, OperationId, OperationKind, Payload, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A queued, not-yet-applied mutation destined for the remote backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingOperationRecord {
    pub id: OperationId,
    pub kind: OperationKind,
    pub collection: Collection,
    pub payload: Payload,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl PendingOperationRecord {
    pub fn new(
        id: OperationId,
        kind: OperationKind,
        collection: Collection,
        payload: Payload,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            collection,
            payload,
            user_id,
            created_at,
        }
    }

    /// Age of the operation at `now`, in whole seconds. Never negative.
    pub fn age_secs(&self, now: DateTime<Utc>) -> u64 {
        now.signed_duration_since(self.created_at)
            .num_seconds()
            .max(0) as u64
    }
}

/// Input for enqueueing a mutation; id and enqueue instant are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingOperationDraft {
    pub kind: OperationKind,
    pub collection: Collection,
    pub payload: Payload,
    pub user_id: UserId,
}

impl PendingOperationDraft {
    pub fn new(
        kind: OperationKind,
        collection: Collection,
        payload: Payload,
        user_id: UserId,
    ) -> Self {
        Self {
            kind,
            collection,
            payload,
            user_id,
        }
    }
}

/// Filter for listing queued operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PendingOperationFilter {
    pub user_id: Option<UserId>,
}

impl PendingOperationFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}
