use crate::application::ports::Connectivity;
use std::sync::Arc;
use tokio::sync::watch;

/// Watch-channel-backed connectivity state. The embedding application feeds
/// platform online/offline events into `set_online`; services read the
/// current value per call and the auto-sync job subscribes to transitions.
#[derive(Clone)]
pub struct SharedConnectivity {
    tx: Arc<watch::Sender<bool>>,
}

impl SharedConnectivity {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    pub fn set_online(&self, online: bool) {
        self.tx.send_replace(online);
    }
}

impl Connectivity for SharedConnectivity {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
