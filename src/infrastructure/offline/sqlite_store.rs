use crate::application::ports::OperationStore;
use crate::domain::entities::{
    DeadLetterRecord, PendingOperationDraft, PendingOperationFilter, PendingOperationRecord,
};
use crate::domain::value_objects::{OperationId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::rows::{millis_to_datetime, DeadLetterRow, PendingOperationRow};

pub struct SqliteOperationStore {
    pool: SqlitePool,
}

impl SqliteOperationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationStore for SqliteOperationStore {
    async fn enqueue(
        &self,
        draft: PendingOperationDraft,
        at: DateTime<Utc>,
    ) -> Result<PendingOperationRecord, AppError> {
        let record = PendingOperationRecord::new(
            OperationId::generate(at),
            draft.kind,
            draft.collection,
            draft.payload,
            draft.user_id,
            at,
        );

        sqlx::query(
            r#"
            INSERT INTO pending_operations (op_id, kind, collection, payload, user_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.kind.as_str())
        .bind(record.collection.as_str())
        .bind(record.payload.as_json().to_string())
        .bind(record.user_id.as_str())
        .bind(record.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_pending(
        &self,
        filter: PendingOperationFilter,
    ) -> Result<Vec<PendingOperationRecord>, AppError> {
        let rows = match &filter.user_id {
            Some(user_id) => {
                sqlx::query_as::<_, PendingOperationRow>(
                    r#"
                    SELECT op_id, kind, collection, payload, user_id, created_at
                    FROM pending_operations
                    WHERE user_id = ?1
                    ORDER BY created_at ASC, op_id ASC
                    "#,
                )
                .bind(user_id.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, PendingOperationRow>(
                    r#"
                    SELECT op_id, kind, collection, payload, user_id, created_at
                    FROM pending_operations
                    ORDER BY created_at ASC, op_id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(|row| row.into_record()).collect()
    }

    async fn remove(&self, id: &OperationId) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pending_operations WHERE op_id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pending_operations")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn pending_stats(
        &self,
        user_id: &UserId,
    ) -> Result<(u64, Option<DateTime<Utc>>), AppError> {
        let (count, oldest): (i64, Option<i64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), MIN(created_at)
            FROM pending_operations
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        let oldest = oldest.map(millis_to_datetime).transpose()?;
        Ok((count.max(0) as u64, oldest))
    }

    async fn dead_letter(
        &self,
        op: &PendingOperationRecord,
        error: Option<&str>,
        expired_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO dead_letters
                (op_id, kind, collection, payload, user_id, created_at, expired_at, last_error)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(op_id) DO UPDATE SET
                expired_at = excluded.expired_at,
                last_error = excluded.last_error
            "#,
        )
        .bind(op.id.as_str())
        .bind(op.kind.as_str())
        .bind(op.collection.as_str())
        .bind(op.payload.as_json().to_string())
        .bind(op.user_id.as_str())
        .bind(op.created_at.timestamp_millis())
        .bind(expired_at.timestamp_millis())
        .bind(error)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM pending_operations WHERE op_id = ?1")
            .bind(op.id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_dead_letters(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DeadLetterRecord>, AppError> {
        let rows = sqlx::query_as::<_, DeadLetterRow>(
            r#"
            SELECT op_id, kind, collection, payload, user_id, created_at, expired_at, last_error
            FROM dead_letters
            WHERE user_id = ?1
            ORDER BY expired_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.into_record()).collect()
    }

    async fn clear_dead_letters(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM dead_letters")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
