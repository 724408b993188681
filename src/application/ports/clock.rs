use chrono::{DateTime, Utc};

/// Time source for enqueue stamps, freshness cutoffs, and retention checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
