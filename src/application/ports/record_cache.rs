use crate::domain::entities::CachedRecord;
use crate::domain::value_objects::{Collection, RecordId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Local snapshot store for remote records, one namespace per collection.
#[async_trait]
pub trait RecordCache: Send + Sync {
    async fn put(&self, record: &CachedRecord) -> Result<(), AppError>;

    async fn put_many(&self, records: &[CachedRecord]) -> Result<(), AppError>;

    /// Latest local copy regardless of age; offline writes merge into it.
    async fn get(
        &self,
        collection: &Collection,
        id: &RecordId,
    ) -> Result<Option<CachedRecord>, AppError>;

    /// A user's records cached at or after `cached_after`. Older entries are
    /// omitted, which is how staleness is surfaced to read paths.
    async fn fresh_for_user(
        &self,
        collection: &Collection,
        user_id: &UserId,
        cached_after: DateTime<Utc>,
    ) -> Result<Vec<CachedRecord>, AppError>;

    async fn remove(&self, collection: &Collection, id: &RecordId) -> Result<(), AppError>;

    async fn clear(&self) -> Result<(), AppError>;
}
