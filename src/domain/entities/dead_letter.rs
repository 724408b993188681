use crate::domain::value_objects::{Collection, OperationId, OperationKind, Payload, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A queued mutation that kept failing past the retention bound. Preserved
/// here instead of being dropped so the application can surface the loss.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeadLetterRecord {
    pub id: OperationId,
    pub kind: OperationKind,
    pub collection: Collection,
    pub payload: Payload,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    pub last_error: Option<String>,
}
