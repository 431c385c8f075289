//! Process-local record store.
//!
//! # Responsibility
//! - Hold a JSON tree addressed by `StorePath`.
//! - Deliver snapshots synchronously to overlapping subscribers.
//!
//! # Invariants
//! - Empty objects left behind by a delete are pruned, so a collection whose
//!   last record was removed reads as absent.
//! - Callbacks run after the tree lock is released.

use super::listeners::ListenerRegistry;
use super::{RecordStore, SnapshotCallback, StorePath, StoreResult, StoreSnapshot, Subscription};
use log::info;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// In-memory `RecordStore`. Clones share the same tree and listeners.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    root: Arc<Mutex<Value>>,
    listeners: Arc<ListenerRegistry>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Mutex::new(Value::Object(Map::new()))),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Reads the value at `path`.
    pub fn get(&self, path: &StorePath) -> StoreSnapshot {
        let root = self.root.lock().unwrap_or_else(PoisonError::into_inner);
        StoreSnapshot::new(path.clone(), lookup(&root, path).cloned())
    }

    /// Writes `value` at `path`, creating intermediate objects. Writing JSON
    /// null is equivalent to a delete.
    pub fn set(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        if value.is_null() {
            return self.delete(path);
        }
        {
            let mut root = self.root.lock().unwrap_or_else(PoisonError::into_inner);
            write(&mut root, path.segments(), value);
        }
        self.notify(path);
        Ok(())
    }

    /// Appends `value` under `collection` with a generated key.
    pub fn push(&self, collection: &StorePath, value: Value) -> StoreResult<String> {
        let key = Uuid::new_v4().simple().to_string();
        let path = collection.child(&key)?;
        self.set(&path, value)?;
        Ok(key)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&self, changed: &StorePath) {
        for (path, callback) in self.listeners.overlapping(changed) {
            let snapshot = self.get(&path);
            callback(&snapshot);
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn subscribe(
        &self,
        path: &StorePath,
        on_change: SnapshotCallback,
    ) -> StoreResult<Subscription> {
        let subscription = self.listeners.register(path, on_change.clone());
        let snapshot = self.get(path);
        on_change(&snapshot);
        Ok(subscription)
    }

    fn delete(&self, path: &StorePath) -> StoreResult<()> {
        let removed = {
            let mut root = self.root.lock().unwrap_or_else(PoisonError::into_inner);
            remove(&mut root, path.segments())
        };
        info!(
            "event=store_delete module=store status=ok backend=memory path={path} removed={removed}"
        );
        if removed {
            self.notify(path);
        }
        Ok(())
    }
}

fn lookup<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}

fn write(node: &mut Value, segments: &[String], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(first.clone()).or_insert(Value::Null);
        write(child, rest, value);
    }
}

/// Removes the value at `segments`; returns whether anything was removed.
fn remove(node: &mut Value, segments: &[String]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let Value::Object(map) = node else {
        return false;
    };
    if rest.is_empty() {
        return map.shift_remove(first).is_some();
    }
    let Some(child) = map.get_mut(first) else {
        return false;
    };
    let removed = remove(child, rest);
    if removed && child.as_object().is_some_and(Map::is_empty) {
        map.shift_remove(first);
    }
    removed
}
