pub mod cached_record;
pub mod dead_letter;
pub mod pending_operation;
pub mod sync_report;
pub mod sync_status;

pub use cached_record::CachedRecord;
pub use dead_letter::DeadLetterRecord;
pub use pending_operation::{PendingOperationDraft, PendingOperationFilter, PendingOperationRecord};
pub use sync_report::SyncReport;
pub use sync_status::SyncStatusSnapshot;
