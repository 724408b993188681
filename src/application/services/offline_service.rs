use crate::application::ports::{Clock, Connectivity, OperationStore, RecordCache, RemoteBackend};
use crate::application::services::SyncServiceTrait;
use crate::domain::entities::{
    CachedRecord, DeadLetterRecord, PendingOperationDraft, SyncReport, SyncStatusSnapshot,
};
use crate::domain::value_objects::{Collection, OperationId, OperationKind, Payload, RecordId, UserId};
use crate::shared::config::CacheConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;
use std::sync::Arc;

/// Read/write routing layer exposed to the rest of the application. Hides the
/// online/offline branch: online calls pass through to the remote backend and
/// refresh the cache, offline reads serve fresh cache entries, offline writes
/// apply locally and enqueue a pending mutation.
#[async_trait]
pub trait OfflineServiceTrait: Send + Sync {
    /// A user's records in one collection. Offline, entries older than the
    /// freshness window are silently omitted.
    async fn records(
        &self,
        collection: &Collection,
        user_id: &UserId,
    ) -> Result<Vec<CachedRecord>, AppError>;

    async fn create(
        &self,
        collection: &Collection,
        user_id: &UserId,
        data: Payload,
    ) -> Result<CachedRecord, AppError>;

    /// Offline, returns `None` when no cached copy existed to merge into;
    /// the mutation is queued either way.
    async fn update(
        &self,
        collection: &Collection,
        user_id: &UserId,
        id: &RecordId,
        partial: Payload,
    ) -> Result<Option<CachedRecord>, AppError>;

    async fn delete(
        &self,
        collection: &Collection,
        user_id: &UserId,
        id: &RecordId,
    ) -> Result<(), AppError>;

    async fn sync_status(&self, user_id: &UserId) -> Result<SyncStatusSnapshot, AppError>;

    async fn trigger_sync(&self, user_id: &UserId) -> Result<SyncReport, AppError>;

    async fn dead_letters(&self, user_id: &UserId) -> Result<Vec<DeadLetterRecord>, AppError>;

    async fn clear_pending(&self) -> Result<(), AppError>;

    async fn clear_cache(&self) -> Result<(), AppError>;
}

pub struct OfflineService {
    store: Arc<dyn OperationStore>,
    cache: Arc<dyn RecordCache>,
    backend: Arc<dyn RemoteBackend>,
    connectivity: Arc<dyn Connectivity>,
    clock: Arc<dyn Clock>,
    sync: Arc<dyn SyncServiceTrait>,
    config: CacheConfig,
}

impl OfflineService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn OperationStore>,
        cache: Arc<dyn RecordCache>,
        backend: Arc<dyn RemoteBackend>,
        connectivity: Arc<dyn Connectivity>,
        clock: Arc<dyn Clock>,
        sync: Arc<dyn SyncServiceTrait>,
        config: CacheConfig,
    ) -> Self {
        Self {
            store,
            cache,
            backend,
            connectivity,
            clock,
            sync,
            config,
        }
    }

    fn freshness(&self) -> Duration {
        Duration::seconds(self.config.freshness_secs as i64)
    }

    async fn enqueue(
        &self,
        kind: OperationKind,
        collection: &Collection,
        payload: Payload,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        let record = self
            .store
            .enqueue(
                PendingOperationDraft::new(kind, collection.clone(), payload, user_id.clone()),
                self.clock.now(),
            )
            .await?;
        tracing::debug!(
            target: "offline::facade",
            op = %record.id,
            kind = %record.kind,
            collection = %record.collection,
            "queued mutation while offline"
        );
        Ok(())
    }
}

#[async_trait]
impl OfflineServiceTrait for OfflineService {
    async fn records(
        &self,
        collection: &Collection,
        user_id: &UserId,
    ) -> Result<Vec<CachedRecord>, AppError> {
        let now = self.clock.now();

        if self.connectivity.is_online() {
            let remote = self.backend.fetch_all(collection, user_id).await?;
            let records: Vec<CachedRecord> = remote
                .into_iter()
                .map(|r| {
                    CachedRecord::new(r.id, collection.clone(), user_id.clone(), r.data, now)
                })
                .collect();
            self.cache.put_many(&records).await?;
            return Ok(records);
        }

        self.cache
            .fresh_for_user(collection, user_id, now - self.freshness())
            .await
    }

    async fn create(
        &self,
        collection: &Collection,
        user_id: &UserId,
        data: Payload,
    ) -> Result<CachedRecord, AppError> {
        let now = self.clock.now();

        if self.connectivity.is_online() {
            let key = OperationId::generate(now);
            let remote = self.backend.insert(collection, &data, &key).await?;
            let record =
                CachedRecord::new(remote.id, collection.clone(), user_id.clone(), remote.data, now);
            self.cache.put(&record).await?;
            return Ok(record);
        }

        let id = RecordId::generate_local();
        let data = data.with_field("id", id.as_str());
        let record = CachedRecord::new(id, collection.clone(), user_id.clone(), data.clone(), now);
        self.cache.put(&record).await?;
        self.enqueue(OperationKind::Create, collection, data, user_id)
            .await?;
        Ok(record)
    }

    async fn update(
        &self,
        collection: &Collection,
        user_id: &UserId,
        id: &RecordId,
        partial: Payload,
    ) -> Result<Option<CachedRecord>, AppError> {
        let now = self.clock.now();

        if self.connectivity.is_online() {
            let key = OperationId::generate(now);
            let remote = self.backend.update(collection, id, &partial, &key).await?;
            let record =
                CachedRecord::new(remote.id, collection.clone(), user_id.clone(), remote.data, now);
            self.cache.put(&record).await?;
            return Ok(Some(record));
        }

        let merged = match self.cache.get(collection, id).await? {
            Some(existing) => {
                let record = CachedRecord::new(
                    id.clone(),
                    collection.clone(),
                    user_id.clone(),
                    existing.data.merged_with(&partial),
                    now,
                );
                self.cache.put(&record).await?;
                Some(record)
            }
            None => None,
        };

        self.enqueue(
            OperationKind::Update,
            collection,
            partial.with_field("id", id.as_str()),
            user_id,
        )
        .await?;
        Ok(merged)
    }

    async fn delete(
        &self,
        collection: &Collection,
        user_id: &UserId,
        id: &RecordId,
    ) -> Result<(), AppError> {
        if self.connectivity.is_online() {
            let key = OperationId::generate(self.clock.now());
            self.backend.delete(collection, id, &key).await?;
            self.cache.remove(collection, id).await?;
            return Ok(());
        }

        self.cache.remove(collection, id).await?;
        let payload =
            Payload::new(json!({ "id": id.as_str() })).map_err(AppError::Validation)?;
        self.enqueue(OperationKind::Delete, collection, payload, user_id)
            .await
    }

    async fn sync_status(&self, user_id: &UserId) -> Result<SyncStatusSnapshot, AppError> {
        let (count, oldest) = self.store.pending_stats(user_id).await?;
        Ok(SyncStatusSnapshot::new(count, oldest))
    }

    async fn trigger_sync(&self, user_id: &UserId) -> Result<SyncReport, AppError> {
        self.sync.drain(user_id).await
    }

    async fn dead_letters(&self, user_id: &UserId) -> Result<Vec<DeadLetterRecord>, AppError> {
        self.store.list_dead_letters(user_id).await
    }

    async fn clear_pending(&self) -> Result<(), AppError> {
        self.store.clear().await
    }

    async fn clear_cache(&self) -> Result<(), AppError> {
        self.cache.clear().await
    }
}
