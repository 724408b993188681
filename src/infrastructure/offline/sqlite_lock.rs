use crate::application::ports::{Clock, SyncLock};
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

/// Lease-based lock stored in the shared database, so every context that can
/// reach the queue also contends on the same lock row. Acquisition is a
/// single conditional upsert; the row's expiry makes a crashed holder's lease
/// reclaimable.
pub struct SqliteSyncLock {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteSyncLock {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl SyncLock for SqliteSyncLock {
    async fn try_acquire(
        &self,
        name: &str,
        owner: &str,
        ttl: Duration,
    ) -> Result<bool, AppError> {
        let now = self.clock.now().timestamp_millis();
        let expires_at = now + ttl.as_millis() as i64;

        let result = sqlx::query(
            r#"
            INSERT INTO sync_leases (name, owner, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
                owner = excluded.owner,
                expires_at = excluded.expires_at
            WHERE sync_leases.expires_at <= ?4
               OR sync_leases.owner = excluded.owner
            "#,
        )
        .bind(name)
        .bind(owner)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, name: &str, owner: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sync_leases WHERE name = ?1 AND owner = ?2")
            .bind(name)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
