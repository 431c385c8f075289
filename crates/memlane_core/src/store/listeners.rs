//! Subscriber bookkeeping shared by store adapters.

use super::{SnapshotCallback, StorePath, Subscription};
use log::debug;
use std::sync::{Arc, Mutex, PoisonError, Weak};

struct ListenerEntry {
    id: u64,
    path: StorePath,
    callback: SnapshotCallback,
}

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

/// Registered snapshot listeners for one adapter instance.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    state: Mutex<RegistryState>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds a listener and returns the handle that removes it again.
    pub(crate) fn register(
        self: &Arc<Self>,
        path: &StorePath,
        callback: SnapshotCallback,
    ) -> Subscription {
        let id = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let id = state.next_id;
            state.next_id += 1;
            state.entries.push(ListenerEntry {
                id,
                path: path.clone(),
                callback,
            });
            id
        };
        debug!("event=store_subscribe module=store status=ok listener_id={id} path={path}");

        let registry: Weak<Self> = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    /// Listeners whose path overlaps `changed`, cloned out of the lock.
    pub(crate) fn overlapping(&self, changed: &StorePath) -> Vec<(StorePath, SnapshotCallback)> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .entries
            .iter()
            .filter(|entry| entry.path.overlaps(changed))
            .map(|entry| (entry.path.clone(), entry.callback.clone()))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    fn remove(&self, id: u64) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.retain(|entry| entry.id != id);
        debug!("event=store_unsubscribe module=store status=ok listener_id={id}");
    }
}
