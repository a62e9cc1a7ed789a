//! Live mirror of the shared record set
//!
//! The sync engine subscribes to the store's push stream and keeps a
//! fully-replaceable in-memory mirror, ordered ascending by id. Readers
//! only ever see whole snapshots; a push replaces the mirror atomically.
//! The mirror never originates a write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::store::{RecordStore, StoreError, StorePush};
use crate::types::ChildRecord;

/// Callback invoked with the freshly replaced mirror on every push.
pub type UpdateHandler = Box<dyn Fn(&[ChildRecord]) + Send + Sync>;

/// Callback invoked when the push stream fails.
pub type ErrorHandler = Box<dyn Fn(&StoreError) + Send + Sync>;

/// Handle to a running subscription.
pub struct Subscription {
    id: Uuid,
    active: AtomicBool,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Release the subscription. Calling this twice is a no-op.
    pub fn unsubscribe(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.task.abort();
            log::info!("subscription {} released", self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Maintains the ordered in-memory mirror of the store's record set
pub struct SyncEngine {
    store: Arc<dyn RecordStore>,
    mirror: Arc<Mutex<Vec<ChildRecord>>>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            mirror: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Clone out the current mirror. Between pushes this stays whatever the
    /// last successful delivery produced, even after a subscription failure.
    pub fn snapshot(&self) -> Vec<ChildRecord> {
        self.mirror
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Start mirroring. The current record set is delivered once up front,
    /// then every store push replaces the mirror and invokes `on_update`.
    ///
    /// On a push-stream failure `on_error` fires once, the subscription
    /// ends, and the last delivered mirror is retained. There is no
    /// automatic retry; the caller decides whether to start a fresh
    /// subscription.
    pub fn start(&self, on_update: UpdateHandler, on_error: ErrorHandler) -> Subscription {
        let id = Uuid::new_v4();
        // Subscribe before the initial read so no intermediate write is
        // missed; a duplicate snapshot is harmless.
        let mut rx = self.store.subscribe();
        let store = Arc::clone(&self.store);
        let mirror = Arc::clone(&self.mirror);

        let task = tokio::spawn(async move {
            match store.list().await {
                Ok(records) => replace_mirror(&mirror, records, &on_update),
                Err(err) => {
                    log::error!("initial record fetch failed: {err}");
                    on_error(&err);
                    return;
                }
            }

            loop {
                match rx.recv().await {
                    Ok(StorePush::Snapshot(records)) => {
                        replace_mirror(&mirror, records, &on_update);
                    }
                    Ok(StorePush::Lost(reason)) => {
                        log::error!("record subscription lost: {reason}");
                        on_error(&StoreError::SubscriptionLost(reason));
                        return;
                    }
                    // Each push carries the full set, so missed pushes are
                    // superseded by the next one.
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        log::info!("subscription {id} started");

        Subscription {
            id,
            active: AtomicBool::new(true),
            task,
        }
    }
}

/// Order the delivered set ascending by id, swap it in as the new mirror,
/// and notify the caller.
fn replace_mirror(
    mirror: &Arc<Mutex<Vec<ChildRecord>>>,
    mut records: Vec<ChildRecord>,
    on_update: &UpdateHandler,
) {
    records.sort_by_key(|r| r.id);
    log::debug!("mirror replaced with {} records", records.len());

    if let Ok(mut guard) = mirror.lock() {
        *guard = records.clone();
    }
    on_update(&records);
}
