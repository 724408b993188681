use crate::application::ports::{Clock, Connectivity, OperationStore, RecordCache, RemoteBackend, SyncLock};
use crate::application::services::{
    OfflineService, OfflineServiceTrait, SyncService, SyncServiceTrait,
};
use crate::domain::value_objects::UserId;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::connectivity::SharedConnectivity;
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::offline::{
    AutoSyncJob, SqliteOperationStore, SqliteRecordCache, SqliteSyncLock,
};
use crate::shared::config::OfflineConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Wired-up offline stack. Owns the database handle and hands out the two
/// service interfaces; the embedding application decides when to open and
/// close it.
pub struct OfflineState {
    pool: ConnectionPool,
    connectivity: SharedConnectivity,
    config: OfflineConfig,
    pub offline_service: Arc<dyn OfflineServiceTrait>,
    pub sync_service: Arc<dyn SyncServiceTrait>,
}

impl OfflineState {
    /// Open the configured database, run migrations, and assemble services.
    pub async fn initialize(
        config: OfflineConfig,
        backend: Arc<dyn RemoteBackend>,
        connectivity: SharedConnectivity,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Configuration)?;
        let pool = ConnectionPool::new(&config.database).await?;
        Self::with_pool(pool, config, backend, connectivity).await
    }

    /// Assemble services over an already-opened pool (tests use an in-memory
    /// one). Migrations are applied here.
    pub async fn with_pool(
        pool: ConnectionPool,
        config: OfflineConfig,
        backend: Arc<dyn RemoteBackend>,
        connectivity: SharedConnectivity,
    ) -> Result<Self, AppError> {
        pool.migrate().await?;

        let sqlite = pool.get_pool().clone();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store: Arc<dyn OperationStore> = Arc::new(SqliteOperationStore::new(sqlite.clone()));
        let cache: Arc<dyn RecordCache> = Arc::new(SqliteRecordCache::new(sqlite.clone()));
        let lock: Arc<dyn SyncLock> = Arc::new(SqliteSyncLock::new(sqlite, clock.clone()));
        let conn: Arc<dyn Connectivity> = Arc::new(connectivity.clone());

        let sync_service: Arc<dyn SyncServiceTrait> = Arc::new(SyncService::new(
            store.clone(),
            backend.clone(),
            conn.clone(),
            lock,
            clock.clone(),
            config.sync.clone(),
        ));

        let offline_service: Arc<dyn OfflineServiceTrait> = Arc::new(OfflineService::new(
            store,
            cache,
            backend,
            conn,
            clock,
            sync_service.clone(),
            config.cache.clone(),
        ));

        Ok(Self {
            pool,
            connectivity,
            config,
            offline_service,
            sync_service,
        })
    }

    /// Start the reconnect-drain job for a signed-in user. Returns `None`
    /// when auto-sync is disabled by configuration.
    pub fn spawn_auto_sync(&self, user_id: UserId) -> Option<JoinHandle<()>> {
        if !self.config.sync.auto_sync {
            return None;
        }
        let job = AutoSyncJob::new(
            self.sync_service.clone(),
            Arc::new(self.connectivity.clone()),
            user_id,
        );
        Some(job.spawn())
    }

    pub fn connectivity(&self) -> &SharedConnectivity {
        &self.connectivity
    }

    pub fn config(&self) -> &OfflineConfig {
        &self.config
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
