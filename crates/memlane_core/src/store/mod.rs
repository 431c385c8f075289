//! Real-time record store contract and adapters.
//!
//! # Responsibility
//! - Define the subscribe/delete contract consumed by feed and review.
//! - Provide process-local and hosted (REST) store adapters.
//!
//! # Invariants
//! - Snapshot callbacks are never invoked while an adapter lock is held.
//! - A `Subscription` releases its callback exactly once (explicitly or on drop).
//! - Snapshot object keys keep store delivery order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod in_memory;
mod listeners;
mod rest;

pub use in_memory::InMemoryRecordStore;
pub use rest::RestRecordStore;

/// Collection path holding every memory record.
pub const MEMORIES_COLLECTION: &str = "memories";

static PATH_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^.#$\[\]/\s][^.#$\[\]/]*$").expect("valid path segment regex"));

pub type StoreResult<T> = Result<T, StoreError>;

/// Store adapter errors.
#[derive(Debug)]
pub enum StoreError {
    /// Path is empty or contains a forbidden character.
    InvalidPath(String),
    /// Request never produced a response.
    Transport(reqwest::Error),
    /// Remote store answered with a non-success status.
    Status { path: String, status: u16 },
    /// Remote payload is not valid JSON.
    Decode(String),
    /// Store is not reachable for a reason reported by the adapter.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(path) => write!(f, "invalid store path: `{path}`"),
            Self::Transport(err) => write!(f, "store request failed: {err}"),
            Self::Status { path, status } => {
                write!(f, "store returned status {status} for `{path}`")
            }
            Self::Decode(details) => write!(f, "store payload is not valid JSON: {details}"),
            Self::Unavailable(details) => write!(f, "store unavailable: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Validated slash-separated store path, e.g. `memories/-Nabc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// Parses and validates a raw path. Leading/trailing slashes are ignored.
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Err(StoreError::InvalidPath(raw.to_string()));
        }
        let segments = trimmed
            .split('/')
            .map(|segment| {
                if PATH_SEGMENT_RE.is_match(segment) {
                    Ok(segment.to_string())
                } else {
                    Err(StoreError::InvalidPath(raw.to_string()))
                }
            })
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Self { segments })
    }

    /// The `memories` collection path.
    pub fn memories() -> Self {
        Self {
            segments: vec![MEMORIES_COLLECTION.to_string()],
        }
    }

    /// The `memories/{id}` record path.
    pub fn memory(id: &str) -> StoreResult<Self> {
        Self::memories().child(id)
    }

    /// Appends one validated segment.
    pub fn child(&self, segment: &str) -> StoreResult<Self> {
        if !PATH_SEGMENT_RE.is_match(segment) {
            return Err(StoreError::InvalidPath(format!("{self}/{segment}")));
        }
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether one path is a segment-wise prefix of the other.
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(left, right)| left == right)
    }
}

impl Display for StorePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Point-in-time copy of the value stored at one path.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    path: StorePath,
    value: Option<Value>,
}

impl StoreSnapshot {
    /// `Value::Null` is normalized to an absent payload.
    pub fn new(path: StorePath, value: Option<Value>) -> Self {
        let value = value.filter(|value| !value.is_null());
        Self { path, value }
    }

    pub fn empty(path: StorePath) -> Self {
        Self { path, value: None }
    }

    pub fn path(&self) -> &StorePath {
        &self.path
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn exists(&self) -> bool {
        self.value.is_some()
    }
}

/// Callback receiving every snapshot of a subscribed path.
pub type SnapshotCallback = Arc<dyn Fn(&StoreSnapshot) + Send + Sync>;

/// Handle for one live subscription.
///
/// Dropping the handle releases the subscription.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Releases the subscription now.
    pub fn cancel(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Read/write operations consumed from the external record store.
pub trait RecordStore: Send + Sync {
    /// Starts delivering snapshots of `path` to `on_change`.
    ///
    /// Adapters deliver the initial snapshot as soon as it is available and
    /// again after every change under `path`.
    fn subscribe(&self, path: &StorePath, on_change: SnapshotCallback)
        -> StoreResult<Subscription>;

    /// Removes the value at `path`. Deleting an absent path is not an error.
    fn delete(&self, path: &StorePath) -> StoreResult<()>;
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn subscribe(
        &self,
        path: &StorePath,
        on_change: SnapshotCallback,
    ) -> StoreResult<Subscription> {
        (**self).subscribe(path, on_change)
    }

    fn delete(&self, path: &StorePath) -> StoreResult<()> {
        (**self).delete(path)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn subscribe(
        &self,
        path: &StorePath,
        on_change: SnapshotCallback,
    ) -> StoreResult<Subscription> {
        (**self).subscribe(path, on_change)
    }

    fn delete(&self, path: &StorePath) -> StoreResult<()> {
        (**self).delete(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, StorePath, StoreSnapshot, Subscription};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn parse_accepts_nested_paths_and_trims_slashes() {
        let path = StorePath::parse("/memories/-Nabc/").unwrap();
        assert_eq!(path.to_string(), "memories/-Nabc");
        assert_eq!(path, StorePath::memory("-Nabc").unwrap());
    }

    #[test]
    fn parse_rejects_forbidden_characters() {
        for raw in ["", "/", "memories/a.b", "memories/#x", "memories//x", "memories/$", "a[0]"] {
            assert!(
                matches!(StorePath::parse(raw), Err(StoreError::InvalidPath(_))),
                "{raw} should be rejected"
            );
        }
        assert!(StorePath::memory("bad/id").is_err());
    }

    #[test]
    fn overlap_is_segment_prefix_in_either_direction() {
        let collection = StorePath::memories();
        let record = StorePath::memory("a").unwrap();
        let other = StorePath::parse("transcriptions/a").unwrap();
        let lookalike = StorePath::parse("memoriesx").unwrap();

        assert!(collection.overlaps(&record));
        assert!(record.overlaps(&collection));
        assert!(!collection.overlaps(&other));
        assert!(!collection.overlaps(&lookalike));
    }

    #[test]
    fn snapshot_normalizes_null_to_absent() {
        let snapshot = StoreSnapshot::new(StorePath::memories(), Some(Value::Null));
        assert!(!snapshot.exists());
    }

    #[test]
    fn subscription_releases_once_on_cancel_or_drop() {
        let released = Arc::new(AtomicUsize::new(0));

        let counter = released.clone();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(subscription.is_active());
        subscription.cancel();
        assert_eq!(released.load(Ordering::SeqCst), 1);

        let counter = released.clone();
        {
            let _subscription = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }
}
