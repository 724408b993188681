use crate::application::ports::{Clock, Connectivity, OperationStore, RemoteBackend, SyncLock};
use crate::domain::entities::{PendingOperationFilter, PendingOperationRecord, SyncReport};
use crate::domain::value_objects::{OperationKind, RecordId, UserId};
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const DRAIN_LEASE_PREFIX: &str = "drain:";

#[async_trait]
pub trait SyncServiceTrait: Send + Sync {
    /// Replay a user's queued mutations against the remote backend. Returns a
    /// zero report without touching the queue when offline, when a drain is
    /// already running in this process, or when another context holds the
    /// drain lease.
    async fn drain(&self, user_id: &UserId) -> Result<SyncReport, AppError>;
}

pub struct SyncService {
    store: Arc<dyn OperationStore>,
    backend: Arc<dyn RemoteBackend>,
    connectivity: Arc<dyn Connectivity>,
    lock: Arc<dyn SyncLock>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
    gate: Mutex<()>,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn OperationStore>,
        backend: Arc<dyn RemoteBackend>,
        connectivity: Arc<dyn Connectivity>,
        lock: Arc<dyn SyncLock>,
        clock: Arc<dyn Clock>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            backend,
            connectivity,
            lock,
            clock,
            config,
            gate: Mutex::new(()),
        }
    }

    async fn replay(&self, user_id: &UserId) -> Result<SyncReport, AppError> {
        let mut ops = self
            .store
            .list_pending(PendingOperationFilter::for_user(user_id.clone()))
            .await?;
        if ops.is_empty() {
            return Ok(SyncReport::skipped());
        }

        // Oldest first; stable sort keeps retrieval order on equal stamps.
        ops.sort_by_key(|op| op.created_at);

        let total = ops.len() as u32;
        let mut success = 0u32;
        let mut failed = 0u32;

        for op in ops {
            match self.dispatch(&op).await {
                Ok(()) => {
                    self.store.remove(&op.id).await?;
                    success += 1;
                }
                Err(err @ (AppError::Remote { .. } | AppError::Validation(_))) => {
                    failed += 1;
                    let now = self.clock.now();
                    if op.age_secs(now) > self.config.retention_secs {
                        tracing::warn!(
                            target: "offline::sync",
                            op = %op.id,
                            kind = %op.kind,
                            collection = %op.collection,
                            error = %err,
                            "operation exceeded retention; moved to dead letters"
                        );
                        self.store
                            .dead_letter(&op, Some(&err.to_string()), now)
                            .await?;
                    } else {
                        tracing::debug!(
                            target: "offline::sync",
                            op = %op.id,
                            error = %err,
                            "operation failed; retained for next drain"
                        );
                    }
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            target: "offline::sync",
            user = %user_id,
            success,
            failed,
            total,
            "drain complete"
        );
        Ok(SyncReport::new(success, failed, total))
    }

    async fn dispatch(&self, op: &PendingOperationRecord) -> Result<(), AppError> {
        match op.kind {
            OperationKind::Create => {
                self.backend
                    .insert(&op.collection, &op.payload, &op.id)
                    .await?;
            }
            OperationKind::Update => {
                let id = Self::record_id_of(op)?;
                self.backend
                    .update(&op.collection, &id, &op.payload, &op.id)
                    .await?;
            }
            OperationKind::Delete => {
                let id = Self::record_id_of(op)?;
                self.backend.delete(&op.collection, &id, &op.id).await?;
            }
        }
        Ok(())
    }

    fn record_id_of(op: &PendingOperationRecord) -> Result<RecordId, AppError> {
        let raw = op.payload.field_str("id").ok_or_else(|| {
            AppError::Validation(format!(
                "Queued {} for {} carries no record id",
                op.kind, op.collection
            ))
        })?;
        RecordId::new(raw.to_string()).map_err(AppError::Validation)
    }
}

#[async_trait]
impl SyncServiceTrait for SyncService {
    async fn drain(&self, user_id: &UserId) -> Result<SyncReport, AppError> {
        let Ok(_gate) = self.gate.try_lock() else {
            return Ok(SyncReport::skipped());
        };

        if !self.connectivity.is_online() {
            tracing::debug!(target: "offline::sync", user = %user_id, "drain skipped: offline");
            return Ok(SyncReport::skipped());
        }

        let lease = format!("{DRAIN_LEASE_PREFIX}{user_id}");
        let ttl = Duration::from_secs(self.config.lease_ttl_secs);
        if !self
            .lock
            .try_acquire(&lease, &self.config.client_id, ttl)
            .await?
        {
            tracing::debug!(
                target: "offline::sync",
                user = %user_id,
                "drain skipped: lease held by another context"
            );
            return Ok(SyncReport::skipped());
        }

        let outcome = self.replay(user_id).await;

        if let Err(err) = self.lock.release(&lease, &self.config.client_id).await {
            tracing::warn!(
                target: "offline::sync",
                error = %err,
                "failed to release drain lease; it will expire on its own"
            );
        }

        outcome
    }
}
