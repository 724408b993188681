use tokio::sync::watch;

/// Connectivity oracle. `is_online` is re-evaluated on every call with no
/// hysteresis; `subscribe` yields the change notifications the auto-sync job
/// listens on.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;

    fn subscribe(&self) -> watch::Receiver<bool>;
}
