use crate::shared::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Named mutual exclusion over the shared durable queue, so two contexts
/// sharing one store cannot drain it at the same time. Leases expire after
/// `ttl` so a crashed holder cannot wedge the queue.
#[async_trait]
pub trait SyncLock: Send + Sync {
    /// Take the named lease if it is free, expired, or already ours.
    async fn try_acquire(&self, name: &str, owner: &str, ttl: Duration)
        -> Result<bool, AppError>;

    /// Give the lease up early. Releasing a lease we do not hold is a no-op.
    async fn release(&self, name: &str, owner: &str) -> Result<(), AppError>;
}
