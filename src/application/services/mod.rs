pub mod offline_service;
pub mod sync_service;

pub use offline_service::{OfflineService, OfflineServiceTrait};
pub use sync_service::{SyncService, SyncServiceTrait};
