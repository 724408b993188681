use crate::domain::entities::{CachedRecord, DeadLetterRecord, PendingOperationRecord};
use crate::domain::value_objects::{
    Collection, OperationId, OperationKind, Payload, RecordId, UserId,
};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PendingOperationRow {
    pub op_id: String,
    pub kind: String,
    pub collection: String,
    pub payload: String,
    pub user_id: String,
    pub created_at: i64,
}

impl PendingOperationRow {
    pub fn into_record(self) -> Result<PendingOperationRecord, AppError> {
        Ok(PendingOperationRecord::new(
            OperationId::new(self.op_id).map_err(corrupt)?,
            OperationKind::try_from(self.kind.as_str()).map_err(corrupt)?,
            Collection::new(self.collection).map_err(corrupt)?,
            Payload::from_json_str(&self.payload).map_err(corrupt)?,
            UserId::new(self.user_id).map_err(corrupt)?,
            millis_to_datetime(self.created_at)?,
        ))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CachedRecordRow {
    pub collection: String,
    pub record_id: String,
    pub user_id: String,
    pub data: String,
    pub cached_at: i64,
}

impl CachedRecordRow {
    pub fn into_record(self) -> Result<CachedRecord, AppError> {
        Ok(CachedRecord::new(
            RecordId::new(self.record_id).map_err(corrupt)?,
            Collection::new(self.collection).map_err(corrupt)?,
            UserId::new(self.user_id).map_err(corrupt)?,
            Payload::from_json_str(&self.data).map_err(corrupt)?,
            millis_to_datetime(self.cached_at)?,
        ))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DeadLetterRow {
    pub op_id: String,
    pub kind: String,
    pub collection: String,
    pub payload: String,
    pub user_id: String,
    pub created_at: i64,
    pub expired_at: i64,
    pub last_error: Option<String>,
}

impl DeadLetterRow {
    pub fn into_record(self) -> Result<DeadLetterRecord, AppError> {
        Ok(DeadLetterRecord {
            id: OperationId::new(self.op_id).map_err(corrupt)?,
            kind: OperationKind::try_from(self.kind.as_str()).map_err(corrupt)?,
            collection: Collection::new(self.collection).map_err(corrupt)?,
            payload: Payload::from_json_str(&self.payload).map_err(corrupt)?,
            user_id: UserId::new(self.user_id).map_err(corrupt)?,
            created_at: millis_to_datetime(self.created_at)?,
            expired_at: millis_to_datetime(self.expired_at)?,
            last_error: self.last_error,
        })
    }
}

pub fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Storage(format!("Timestamp out of range: {millis}")))
}

fn corrupt(message: String) -> AppError {
    AppError::Storage(format!("Corrupt row: {message}"))
}
