use serde::{Deserialize, Serialize};

/// Aggregate outcome of one drain run. Dead-lettered operations count as
/// failed; `total` is the number of operations the run attempted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub success: u32,
    pub failed: u32,
    pub total: u32,
}

impl SyncReport {
    pub fn new(success: u32, failed: u32, total: u32) -> Self {
        Self {
            success,
            failed,
            total,
        }
    }

    /// Report for a run that did not start (offline, or another drain holds
    /// the lease).
    pub fn skipped() -> Self {
        Self::default()
    }
}
