pub mod autosync_job;
mod rows;
pub mod sqlite_cache;
pub mod sqlite_lock;
pub mod sqlite_store;

pub use autosync_job::AutoSyncJob;
pub use sqlite_cache::SqliteRecordCache;
pub use sqlite_lock::SqliteSyncLock;
pub use sqlite_store::SqliteOperationStore;
