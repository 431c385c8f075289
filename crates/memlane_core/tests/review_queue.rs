use memlane_core::store::SnapshotCallback;
use memlane_core::{
    InMemoryRecordStore, MemoryRecord, QueuePosition, RecordStore, RejectOutcome, ReviewError,
    ReviewQueue, ReviewSummary, StoreError, StorePath, StoreResult, Subscription,
};
use serde_json::json;
use std::sync::Mutex;

/// Store double whose deletes always fail.
#[derive(Default)]
struct FailingStore {
    attempts: Mutex<Vec<String>>,
}

impl RecordStore for FailingStore {
    fn subscribe(&self, _path: &StorePath, _on_change: SnapshotCallback) -> StoreResult<Subscription> {
        Ok(Subscription::detached())
    }

    fn delete(&self, path: &StorePath) -> StoreResult<()> {
        self.attempts.lock().unwrap().push(path.to_string());
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

fn records(ids: &[&str]) -> Vec<MemoryRecord> {
    ids.iter()
        .map(|id| MemoryRecord::new(*id, format!("topic {id}"), "2025-02-16 08-00-00"))
        .collect()
}

fn seeded_store(ids: &[&str]) -> InMemoryRecordStore {
    let store = InMemoryRecordStore::new();
    for id in ids {
        store
            .set(
                &StorePath::memory(id).unwrap(),
                json!({ "topic": id, "timestamp": "2025-02-16 08-00-00" }),
            )
            .unwrap();
    }
    store
}

fn current_id<S: RecordStore>(queue: &ReviewQueue<S>) -> Option<String> {
    queue.current_record().map(|record| record.id.clone())
}

#[test]
fn keep_all_reaches_summary_with_nothing_rejected() {
    let store = seeded_store(&["a", "b"]);
    let mut queue = ReviewQueue::enter(&store, records(&["a", "b"]));

    assert_eq!(current_id(&queue).as_deref(), Some("a"));
    queue.advance().unwrap();
    assert_eq!(current_id(&queue).as_deref(), Some("b"));
    queue.advance().unwrap();

    assert_eq!(
        queue.current(),
        QueuePosition::Exhausted(ReviewSummary {
            kept: 2,
            rejected: 0,
            total: 2
        })
    );
}

#[test]
fn reject_deletes_from_store_and_advances() {
    let store = seeded_store(&["a", "b", "c"]);
    let mut queue = ReviewQueue::enter(&store, records(&["a", "b", "c"]));

    queue.advance().unwrap();
    let outcome = queue.reject("b").unwrap();
    assert!(outcome.is_deleted());
    assert_eq!(current_id(&queue).as_deref(), Some("c"));
    assert!(!store.get(&StorePath::memory("b").unwrap()).exists());
    assert!(store.get(&StorePath::memory("a").unwrap()).exists());

    queue.advance().unwrap();
    assert_eq!(
        queue.summary(),
        ReviewSummary {
            kept: 2,
            rejected: 1,
            total: 3
        }
    );
    let remaining = queue.remaining().map(|r| r.id.as_str()).collect::<Vec<_>>();
    assert_eq!(remaining, vec!["a", "c"]);
}

#[test]
fn failed_delete_still_counts_and_advances() {
    let store = FailingStore::default();
    let mut queue = ReviewQueue::enter(&store, records(&["a", "b"]));

    let outcome = queue.reject("a").unwrap();
    assert!(matches!(outcome, RejectOutcome::DeleteFailed(StoreError::Unavailable(_))));
    assert_eq!(queue.cursor(), 1);
    assert!(queue.rejected_ids().contains("a"));
    assert_eq!(*store.attempts.lock().unwrap(), vec!["memories/a".to_string()]);
}

#[test]
fn reject_requires_current_record() {
    let store = seeded_store(&["a", "b"]);
    let mut queue = ReviewQueue::enter(&store, records(&["a", "b"]));

    let err = queue.reject("b").unwrap_err();
    assert_eq!(
        err,
        ReviewError::NotCurrent {
            expected: "a".to_string(),
            actual: "b".to_string()
        }
    );
    assert_eq!(queue.cursor(), 0);
    assert!(queue.rejected_ids().is_empty());
    assert!(store.get(&StorePath::memory("b").unwrap()).exists());
}

#[test]
fn exhausted_queue_rejects_navigation_without_state_change() {
    let store = seeded_store(&["a"]);
    let mut queue = ReviewQueue::enter(&store, records(&["a"]));
    queue.reject("a").unwrap();

    assert!(queue.is_exhausted());
    assert_eq!(queue.advance(), Err(ReviewError::Exhausted));
    assert!(matches!(queue.reject("a"), Err(ReviewError::Exhausted)));
    assert_eq!(queue.cursor(), 1);
    assert_eq!(
        queue.summary(),
        ReviewSummary {
            kept: 0,
            rejected: 1,
            total: 1
        }
    );
}

#[test]
fn empty_queue_is_immediately_exhausted() {
    let store = InMemoryRecordStore::new();
    let queue = ReviewQueue::enter(&store, Vec::new());

    assert!(queue.is_empty());
    assert_eq!(
        queue.current(),
        QueuePosition::Exhausted(ReviewSummary {
            kept: 0,
            rejected: 0,
            total: 0
        })
    );
}

#[test]
fn reset_starts_a_fresh_session() {
    let store = seeded_store(&["a", "b", "c"]);
    let mut queue = ReviewQueue::enter(&store, records(&["a", "b", "c"]));
    queue.reject("a").unwrap();
    queue.advance().unwrap();

    queue.reset(records(&["b", "c"]));
    assert_eq!(queue.cursor(), 0);
    assert!(queue.rejected_ids().is_empty());
    assert_eq!(queue.len(), 2);
    assert_eq!(current_id(&queue).as_deref(), Some("b"));
}

#[test]
fn find_reads_without_moving_cursor() {
    let store = seeded_store(&["a", "b"]);
    let queue = ReviewQueue::enter(&store, records(&["a", "b"]));

    assert_eq!(queue.find("b").map(|r| r.topic.as_str()), Some("topic b"));
    assert!(queue.find("zzz").is_none());
    assert_eq!(queue.cursor(), 0);
}

#[test]
fn summary_counts_always_add_up() {
    let ids = ["a", "b", "c", "d", "e"];
    let store = seeded_store(&ids);
    let mut queue = ReviewQueue::enter(&store, records(&ids));

    for (step, id) in ids.iter().enumerate() {
        if step % 2 == 0 {
            queue.reject(id).unwrap();
        } else {
            queue.advance().unwrap();
        }
        let summary = queue.summary();
        assert_eq!(summary.kept + summary.rejected, summary.total);
        assert_eq!(queue.cursor(), step + 1);
    }
    assert_eq!(queue.summary().rejected, 3);
}
