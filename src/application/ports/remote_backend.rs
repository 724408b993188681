use crate::domain::value_objects::{Collection, OperationId, Payload, RecordId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A record as returned by the remote backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteRecord {
    pub id: RecordId,
    pub data: Payload,
}

impl RemoteRecord {
    pub fn new(id: RecordId, data: Payload) -> Self {
        Self { id, data }
    }
}

/// The managed backend the queue drains against. Implementations are expected
/// to deduplicate mutations on the idempotency key, and to accept
/// client-generated record ids on insert as canonical.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    async fn fetch_all(
        &self,
        collection: &Collection,
        user_id: &UserId,
    ) -> Result<Vec<RemoteRecord>, AppError>;

    async fn insert(
        &self,
        collection: &Collection,
        record: &Payload,
        idempotency_key: &OperationId,
    ) -> Result<RemoteRecord, AppError>;

    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        partial: &Payload,
        idempotency_key: &OperationId,
    ) -> Result<RemoteRecord, AppError>;

    async fn delete(
        &self,
        collection: &Collection,
        id: &RecordId,
        idempotency_key: &OperationId,
    ) -> Result<(), AppError>;
}
