use crate::application::ports::RecordCache;
use crate::domain::entities::CachedRecord;
use crate::domain::value_objects::{Collection, RecordId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::rows::CachedRecordRow;

const UPSERT_RECORD: &str = r#"
INSERT INTO cached_records (collection, record_id, user_id, data, cached_at)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(collection, record_id) DO UPDATE SET
    user_id = excluded.user_id,
    data = excluded.data,
    cached_at = excluded.cached_at
"#;

pub struct SqliteRecordCache {
    pool: SqlitePool,
}

impl SqliteRecordCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordCache for SqliteRecordCache {
    async fn put(&self, record: &CachedRecord) -> Result<(), AppError> {
        sqlx::query(UPSERT_RECORD)
            .bind(record.collection.as_str())
            .bind(record.id.as_str())
            .bind(record.user_id.as_str())
            .bind(record.data.as_json().to_string())
            .bind(record.cached_at.timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn put_many(&self, records: &[CachedRecord]) -> Result<(), AppError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for record in records {
            sqlx::query(UPSERT_RECORD)
                .bind(record.collection.as_str())
                .bind(record.id.as_str())
                .bind(record.user_id.as_str())
                .bind(record.data.as_json().to_string())
                .bind(record.cached_at.timestamp_millis())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get(
        &self,
        collection: &Collection,
        id: &RecordId,
    ) -> Result<Option<CachedRecord>, AppError> {
        let row = sqlx::query_as::<_, CachedRecordRow>(
            r#"
            SELECT collection, record_id, user_id, data, cached_at
            FROM cached_records
            WHERE collection = ?1 AND record_id = ?2
            "#,
        )
        .bind(collection.as_str())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row.into_record()).transpose()
    }

    async fn fresh_for_user(
        &self,
        collection: &Collection,
        user_id: &UserId,
        cached_after: DateTime<Utc>,
    ) -> Result<Vec<CachedRecord>, AppError> {
        let rows = sqlx::query_as::<_, CachedRecordRow>(
            r#"
            SELECT collection, record_id, user_id, data, cached_at
            FROM cached_records
            WHERE collection = ?1 AND user_id = ?2 AND cached_at >= ?3
            ORDER BY cached_at ASC, record_id ASC
            "#,
        )
        .bind(collection.as_str())
        .bind(user_id.as_str())
        .bind(cached_after.timestamp_millis())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.into_record()).collect()
    }

    async fn remove(&self, collection: &Collection, id: &RecordId) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cached_records WHERE collection = ?1 AND record_id = ?2")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cached_records")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Payload;
    use crate::infrastructure::database::ConnectionPool;
    use chrono::Duration;

    async fn setup_cache() -> SqliteRecordCache {
        let pool = ConnectionPool::in_memory().await.unwrap();
        pool.migrate().await.unwrap();
        SqliteRecordCache::new(pool.get_pool().clone())
    }

    fn record(id: &str, cached_at: DateTime<Utc>) -> CachedRecord {
        CachedRecord::new(
            RecordId::new(id.into()).unwrap(),
            Collection::new("projects".into()).unwrap(),
            UserId::new("u1".into()).unwrap(),
            Payload::from_json_str(&format!(r#"{{"id":"{id}","name":"p"}}"#)).unwrap(),
            cached_at,
        )
    }

    #[tokio::test]
    async fn put_overwrites_same_key_in_place() {
        let cache = setup_cache().await;
        let now = Utc::now();
        let collection = Collection::new("projects".into()).unwrap();
        let id = RecordId::new("p1".into()).unwrap();

        cache.put(&record("p1", now)).await.unwrap();
        let mut updated = record("p1", now + Duration::seconds(1));
        updated.data = Payload::from_json_str(r#"{"id":"p1","name":"renamed"}"#).unwrap();
        cache.put(&updated).await.unwrap();

        let got = cache.get(&collection, &id).await.unwrap().unwrap();
        assert_eq!(got.data.field_str("name"), Some("renamed"));
    }

    #[tokio::test]
    async fn fresh_for_user_omits_entries_before_cutoff() {
        let cache = setup_cache().await;
        let now = Utc::now();
        let collection = Collection::new("projects".into()).unwrap();
        let user = UserId::new("u1".into()).unwrap();

        cache
            .put(&record("stale", now - Duration::minutes(10)))
            .await
            .unwrap();
        cache.put(&record("fresh", now)).await.unwrap();

        let fresh = cache
            .fresh_for_user(&collection, &user, now - Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id.as_str(), "fresh");
    }

    #[tokio::test]
    async fn clear_empties_every_namespace() {
        let cache = setup_cache().await;
        let now = Utc::now();
        cache.put(&record("p1", now)).await.unwrap();
        cache.put(&record("p2", now)).await.unwrap();

        cache.clear().await.unwrap();

        let collection = Collection::new("projects".into()).unwrap();
        let user = UserId::new("u1".into()).unwrap();
        let rest = cache
            .fresh_for_user(&collection, &user, now - Duration::minutes(5))
            .await
            .unwrap();
        assert!(rest.is_empty());
    }
}
