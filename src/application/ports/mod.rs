pub mod clock;
pub mod connectivity;
pub mod operation_store;
pub mod record_cache;
pub mod remote_backend;
pub mod sync_lock;

pub use clock::Clock;
pub use connectivity::Connectivity;
pub use operation_store::OperationStore;
pub use record_cache::RecordCache;
pub use remote_backend::{RemoteBackend, RemoteRecord};
pub use sync_lock::SyncLock;
