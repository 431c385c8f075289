//! Hosted record store adapter over the store's REST surface.
//!
//! # Responsibility
//! - Read `{base}/{path}.json` and delete through `DELETE {base}/{path}.json`.
//! - Re-deliver fresh snapshots to overlapping subscribers after a delete.
//!
//! # Invariants
//! - A failed fetch is delivered as an empty snapshot; it never reaches the
//!   subscriber as an error.
//! - No retries; a request without a configured timeout may wait indefinitely.

use super::listeners::ListenerRegistry;
use super::{
    RecordStore, SnapshotCallback, StoreError, StorePath, StoreResult, StoreSnapshot, Subscription,
};
use log::{info, warn};
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// REST-backed `RecordStore`.
pub struct RestRecordStore {
    base_url: String,
    http: Client,
    listeners: Arc<ListenerRegistry>,
}

impl RestRecordStore {
    /// Creates an adapter rooted at `base_url` (e.g. `https://x.firebaseio.com`).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> StoreResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StoreError::Unavailable(
                "store base url cannot be empty".to_string(),
            ));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            listeners: ListenerRegistry::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the current value at `path`.
    pub fn fetch(&self, path: &StorePath) -> StoreResult<StoreSnapshot> {
        let started_at = Instant::now();
        let response = self.http.get(self.url_for(path)).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=store_fetch module=store status=error backend=rest path={path} http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(StoreError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        let value = serde_json::from_str::<Value>(&body)
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        info!(
            "event=store_fetch module=store status=ok backend=rest path={path} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(StoreSnapshot::new(path.clone(), Some(value)))
    }

    fn fetch_or_empty(&self, path: &StorePath) -> StoreSnapshot {
        match self.fetch(path) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "event=store_fetch module=store status=degraded backend=rest path={path} error={err}"
                );
                StoreSnapshot::empty(path.clone())
            }
        }
    }

    fn url_for(&self, path: &StorePath) -> String {
        format!("{}/{}.json", self.base_url, path)
    }
}

impl RecordStore for RestRecordStore {
    fn subscribe(
        &self,
        path: &StorePath,
        on_change: SnapshotCallback,
    ) -> StoreResult<Subscription> {
        let subscription = self.listeners.register(path, on_change.clone());
        let snapshot = self.fetch_or_empty(path);
        on_change(&snapshot);
        Ok(subscription)
    }

    fn delete(&self, path: &StorePath) -> StoreResult<()> {
        let started_at = Instant::now();
        let response = self.http.delete(self.url_for(path)).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=store_delete module=store status=error backend=rest path={path} http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(StoreError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        info!(
            "event=store_delete module=store status=ok backend=rest path={path} duration_ms={}",
            started_at.elapsed().as_millis()
        );

        for (listener_path, callback) in self.listeners.overlapping(path) {
            let snapshot = self.fetch_or_empty(&listener_path);
            callback(&snapshot);
        }
        Ok(())
    }
}
