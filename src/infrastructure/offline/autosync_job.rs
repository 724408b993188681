use crate::application::ports::Connectivity;
use crate::application::services::SyncServiceTrait;
use crate::domain::value_objects::UserId;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Background job that listens for connectivity transitions and drains the
/// queue whenever the runtime comes back online.
pub struct AutoSyncJob {
    sync: Arc<dyn SyncServiceTrait>,
    connectivity: Arc<dyn Connectivity>,
    user_id: UserId,
}

impl AutoSyncJob {
    pub fn new(
        sync: Arc<dyn SyncServiceTrait>,
        connectivity: Arc<dyn Connectivity>,
        user_id: UserId,
    ) -> Arc<Self> {
        Arc::new(Self {
            sync,
            connectivity,
            user_id,
        })
    }

    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let job = Arc::clone(self);
        // Subscribe before spawning so a transition fired right after this
        // call is never missed.
        let rx = self.connectivity.subscribe();
        tokio::spawn(async move {
            job.run(rx).await;
        })
    }

    async fn run(&self, mut rx: tokio::sync::watch::Receiver<bool>) {
        let mut was_online = *rx.borrow();

        // Exits when the connectivity sender is dropped.
        while rx.changed().await.is_ok() {
            let online = *rx.borrow_and_update();
            if online && !was_online {
                self.drain_once().await;
            }
            was_online = online;
        }
    }

    async fn drain_once(&self) {
        match self.sync.drain(&self.user_id).await {
            Ok(report) => {
                tracing::info!(
                    target: "offline::autosync",
                    user = %self.user_id,
                    success = report.success,
                    failed = report.failed,
                    total = report.total,
                    "reconnect drain finished"
                );
            }
            Err(err) => {
                tracing::error!(
                    target: "offline::autosync",
                    user = %self.user_id,
                    error = %err,
                    "reconnect drain failed"
                );
            }
        }
    }
}
