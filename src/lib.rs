pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{
    Clock, Connectivity, OperationStore, RecordCache, RemoteBackend, RemoteRecord, SyncLock,
};
pub use application::services::{OfflineService, OfflineServiceTrait, SyncService, SyncServiceTrait};
pub use domain::entities::{
    CachedRecord, DeadLetterRecord, PendingOperationDraft, PendingOperationFilter,
    PendingOperationRecord, SyncReport, SyncStatusSnapshot,
};
pub use domain::value_objects::{
    Collection, OperationId, OperationKind, Payload, RecordId, UserId,
};
pub use shared::config::OfflineConfig;
pub use shared::error::{AppError, Result};
pub use state::OfflineState;

pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devtrack_offline=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
