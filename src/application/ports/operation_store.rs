use crate::domain::entities::{
    DeadLetterRecord, PendingOperationDraft, PendingOperationFilter, PendingOperationRecord,
};
use crate::domain::value_objects::{OperationId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable queue of mutations awaiting remote application.
#[async_trait]
pub trait OperationStore: Send + Sync {
    /// Persist a mutation with a fresh id and the given enqueue instant.
    async fn enqueue(
        &self,
        draft: PendingOperationDraft,
        at: DateTime<Utc>,
    ) -> Result<PendingOperationRecord, AppError>;

    /// All stored operations, optionally scoped to one user. Retrieval order
    /// is deterministic but not meaningful; callers sort on `created_at`.
    async fn list_pending(
        &self,
        filter: PendingOperationFilter,
    ) -> Result<Vec<PendingOperationRecord>, AppError>;

    /// Delete one operation. Removing an unknown id is not an error.
    async fn remove(&self, id: &OperationId) -> Result<(), AppError>;

    /// Empty the queue unconditionally. Diagnostic use.
    async fn clear(&self) -> Result<(), AppError>;

    /// Count and oldest enqueue instant of a user's queued operations.
    async fn pending_stats(
        &self,
        user_id: &UserId,
    ) -> Result<(u64, Option<DateTime<Utc>>), AppError>;

    /// Move an operation out of the queue into the dead-letter table.
    async fn dead_letter(
        &self,
        op: &PendingOperationRecord,
        error: Option<&str>,
        expired_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn list_dead_letters(&self, user_id: &UserId)
        -> Result<Vec<DeadLetterRecord>, AppError>;

    async fn clear_dead_letters(&self) -> Result<(), AppError>;
}
