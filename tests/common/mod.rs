#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use devtrack_offline::application::ports::{
    Clock, Connectivity, OperationStore, RecordCache, RemoteBackend, RemoteRecord, SyncLock,
};
use devtrack_offline::application::services::{OfflineService, SyncService, SyncServiceTrait};
use devtrack_offline::infrastructure::clock::SystemClock;
use devtrack_offline::infrastructure::connectivity::SharedConnectivity;
use devtrack_offline::infrastructure::database::ConnectionPool;
use devtrack_offline::infrastructure::offline::{
    SqliteOperationStore, SqliteRecordCache, SqliteSyncLock,
};
use devtrack_offline::shared::config::OfflineConfig;
use devtrack_offline::shared::error::AppError;
use devtrack_offline::{Collection, OperationId, Payload, RecordId, UserId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Clock whose time only moves when a test says so.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(start),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub op: &'static str,
    pub collection: String,
    pub record_id: Option<String>,
    pub idempotency_key: String,
    pub payload: Option<serde_json::Value>,
}

/// Scripted remote backend. Inserts and updates fail when the payload's
/// `title` is in `fail_titles` or when `fail_all` is set; every call is
/// recorded for assertions.
#[derive(Default)]
pub struct MockRemoteBackend {
    pub calls: Mutex<Vec<RecordedCall>>,
    pub fail_titles: Mutex<HashSet<String>>,
    pub fail_all: AtomicBool,
    pub fetch_results: Mutex<Vec<RemoteRecord>>,
    next_server_id: AtomicU64,
}

impl MockRemoteBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_title(&self, title: &str) {
        self.fail_titles.lock().unwrap().insert(title.to_string());
    }

    pub fn set_fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn set_fetch_results(&self, records: Vec<RemoteRecord>) {
        *self.fetch_results.lock().unwrap() = records;
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn recorded_ops(&self, op: &str) -> Vec<RecordedCall> {
        self.recorded()
            .into_iter()
            .filter(|call| call.op == op)
            .collect()
    }

    fn should_fail(&self, payload: &Payload) -> bool {
        if self.fail_all.load(Ordering::SeqCst) {
            return true;
        }
        payload
            .field_str("title")
            .map(|title| self.fail_titles.lock().unwrap().contains(title))
            .unwrap_or(false)
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteBackend for MockRemoteBackend {
    async fn fetch_all(
        &self,
        collection: &Collection,
        _user_id: &UserId,
    ) -> Result<Vec<RemoteRecord>, AppError> {
        self.record(RecordedCall {
            op: "fetch_all",
            collection: collection.to_string(),
            record_id: None,
            idempotency_key: String::new(),
            payload: None,
        });
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(AppError::remote("fetch_all", "scripted failure"));
        }
        Ok(self.fetch_results.lock().unwrap().clone())
    }

    async fn insert(
        &self,
        collection: &Collection,
        record: &Payload,
        idempotency_key: &OperationId,
    ) -> Result<RemoteRecord, AppError> {
        self.record(RecordedCall {
            op: "insert",
            collection: collection.to_string(),
            record_id: record.field_str("id").map(str::to_string),
            idempotency_key: idempotency_key.to_string(),
            payload: Some(record.as_json().clone()),
        });
        if self.should_fail(record) {
            return Err(AppError::remote("insert", "scripted failure"));
        }

        // Client-supplied ids are canonical; otherwise assign a server id.
        let (id, data) = match record.field_str("id") {
            Some(id) => (id.to_string(), record.clone()),
            None => {
                let id = format!("srv-{}", self.next_server_id.fetch_add(1, Ordering::SeqCst));
                (id.clone(), record.with_field("id", &id))
            }
        };
        Ok(RemoteRecord::new(RecordId::new(id).unwrap(), data))
    }

    async fn update(
        &self,
        collection: &Collection,
        id: &RecordId,
        partial: &Payload,
        idempotency_key: &OperationId,
    ) -> Result<RemoteRecord, AppError> {
        self.record(RecordedCall {
            op: "update",
            collection: collection.to_string(),
            record_id: Some(id.to_string()),
            idempotency_key: idempotency_key.to_string(),
            payload: Some(partial.as_json().clone()),
        });
        if self.should_fail(partial) {
            return Err(AppError::remote("update", "scripted failure"));
        }
        Ok(RemoteRecord::new(
            id.clone(),
            partial.with_field("id", id.as_str()),
        ))
    }

    async fn delete(
        &self,
        collection: &Collection,
        id: &RecordId,
        idempotency_key: &OperationId,
    ) -> Result<(), AppError> {
        self.record(RecordedCall {
            op: "delete",
            collection: collection.to_string(),
            record_id: Some(id.to_string()),
            idempotency_key: idempotency_key.to_string(),
            payload: None,
        });
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(AppError::remote("delete", "scripted failure"));
        }
        Ok(())
    }
}

/// Fully wired service stack over one database, with scripted collaborators.
pub struct TestStack {
    pub pool: ConnectionPool,
    pub store: Arc<dyn OperationStore>,
    pub cache: Arc<dyn RecordCache>,
    pub backend: Arc<MockRemoteBackend>,
    pub connectivity: SharedConnectivity,
    pub clock: Arc<ManualClock>,
    pub sync: Arc<SyncService>,
    pub facade: OfflineService,
}

pub async fn stack() -> TestStack {
    let pool = ConnectionPool::in_memory().await.unwrap();
    pool.migrate().await.unwrap();
    stack_over(pool, true).await
}

pub async fn stack_over(pool: ConnectionPool, online: bool) -> TestStack {
    let config = OfflineConfig::default();
    let sqlite = pool.get_pool().clone();

    let clock = ManualClock::new(Utc::now());
    let store: Arc<dyn OperationStore> = Arc::new(SqliteOperationStore::new(sqlite.clone()));
    let cache: Arc<dyn RecordCache> = Arc::new(SqliteRecordCache::new(sqlite.clone()));
    // Lease expiry is judged against real time; the manual clock only drives
    // enqueue stamps and freshness so tests can cross those windows.
    let lock: Arc<dyn SyncLock> = Arc::new(SqliteSyncLock::new(sqlite, Arc::new(SystemClock)));
    let backend = MockRemoteBackend::new();
    let connectivity = SharedConnectivity::new(online);
    let conn: Arc<dyn Connectivity> = Arc::new(connectivity.clone());

    let sync = Arc::new(SyncService::new(
        store.clone(),
        backend.clone(),
        conn.clone(),
        lock,
        clock.clone(),
        config.sync.clone(),
    ));

    let facade = OfflineService::new(
        store.clone(),
        cache.clone(),
        backend.clone(),
        conn,
        clock.clone(),
        sync.clone() as Arc<dyn SyncServiceTrait>,
        config.cache.clone(),
    );

    TestStack {
        pool,
        store,
        cache,
        backend,
        connectivity,
        clock,
        sync,
        facade,
    }
}

pub fn user(id: &str) -> UserId {
    UserId::new(id.into()).unwrap()
}

pub fn collection(name: &str) -> Collection {
    Collection::new(name.into()).unwrap()
}

pub fn payload(json: &str) -> Payload {
    Payload::from_json_str(json).unwrap()
}
