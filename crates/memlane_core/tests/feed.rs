use chrono::NaiveDate;
use memlane_core::{
    FeedState, FeedView, FixedClock, InMemoryRecordStore, MemoryFeed, RecordStore, StorePath,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 16).unwrap()
}

fn seed(store: &InMemoryRecordStore, key: &str, topic: &str, timestamp: &str) {
    store
        .set(
            &StorePath::memory(key).unwrap(),
            json!({ "topic": topic, "timestamp": timestamp, "image_url": format!("https://img/{key}.png") }),
        )
        .unwrap();
}

fn ids(state: &FeedState) -> Vec<&str> {
    state.records.iter().map(|record| record.id.as_str()).collect()
}

#[test]
fn detached_feed_reports_loading() {
    let feed = MemoryFeed::new(FeedView::All);
    assert!(feed.is_loading());
    assert!(feed.records().is_empty());
    assert!(!feed.is_attached());
    assert!(!feed.state().is_empty_loaded());
}

#[test]
fn all_view_orders_newest_first() {
    let store = InMemoryRecordStore::new();
    seed(&store, "m1", "Morning walk", "2025-02-16 06-33-16");
    seed(&store, "m2", "Lunch", "2025-02-16 12-00-00");
    seed(&store, "m3", "Old trip", "2024-11-02 09-15-00");

    let mut feed = MemoryFeed::new(FeedView::All);
    feed.attach(&store).unwrap();

    let state = feed.state();
    assert!(!state.is_loading);
    assert_eq!(ids(&state), vec!["m2", "m1", "m3"]);
}

#[test]
fn today_view_keeps_store_order_and_filters_by_date() {
    let store = InMemoryRecordStore::new();
    seed(&store, "late", "Dinner", "2025-02-16 19-00-00");
    seed(&store, "old", "Yesterday", "2025-02-15 23-59-59");
    seed(&store, "early", "Coffee", "2025-02-16 07-10-00");

    let mut feed = MemoryFeed::with_clock(FeedView::Today, Arc::new(FixedClock(today())));
    feed.attach(&store).unwrap();

    assert_eq!(ids(&feed.state()), vec!["late", "early"]);
}

#[test]
fn empty_collection_loads_as_empty() {
    let store = InMemoryRecordStore::new();
    let mut feed = MemoryFeed::new(FeedView::All);
    feed.attach(&store).unwrap();

    let state = feed.state();
    assert!(state.is_empty_loaded());
}

#[test]
fn listeners_see_every_store_change() {
    let store = InMemoryRecordStore::new();
    seed(&store, "m1", "First", "2025-02-16 08-00-00");

    let mut feed = MemoryFeed::with_clock(FeedView::Today, Arc::new(FixedClock(today())));
    let seen = Arc::new(Mutex::new(Vec::<usize>::new()));
    let sink = Arc::clone(&seen);
    feed.on_update(move |state| sink.lock().unwrap().push(state.records.len()));
    feed.attach(&store).unwrap();

    seed(&store, "m2", "Second", "2025-02-16 09-00-00");
    store.delete(&StorePath::memory("m1").unwrap()).unwrap();
    store.delete(&StorePath::memory("m2").unwrap()).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1, 0]);
    assert!(feed.state().is_empty_loaded());
}

#[test]
fn detach_releases_subscription_and_ignores_later_changes() {
    let store = InMemoryRecordStore::new();
    seed(&store, "m1", "First", "2025-02-16 08-00-00");

    let mut feed = MemoryFeed::new(FeedView::All);
    feed.attach(&store).unwrap();
    assert_eq!(store.subscriber_count(), 1);

    feed.detach();
    assert!(!feed.is_attached());
    assert_eq!(store.subscriber_count(), 0);

    seed(&store, "m2", "Second", "2025-02-16 09-00-00");
    assert_eq!(ids(&feed.state()), vec!["m1"]);
}

#[test]
fn dropping_feed_releases_subscription() {
    let store = InMemoryRecordStore::new();
    {
        let mut feed = MemoryFeed::new(FeedView::All);
        feed.attach(&store).unwrap();
        assert_eq!(store.subscriber_count(), 1);
    }
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn reattach_replaces_previous_subscription() {
    let first = InMemoryRecordStore::new();
    let second = InMemoryRecordStore::new();
    seed(&first, "a", "From first", "2025-02-16 08-00-00");
    seed(&second, "b", "From second", "2025-02-16 08-00-00");

    let mut feed = MemoryFeed::new(FeedView::All);
    feed.attach(&first).unwrap();
    feed.attach(&second).unwrap();
    assert_eq!(first.subscriber_count(), 0);

    seed(&first, "c", "Ignored", "2025-02-16 10-00-00");
    assert_eq!(ids(&feed.state()), vec!["b"]);
}

#[test]
fn non_object_entries_are_skipped_and_mistyped_fields_tolerated() {
    let store = InMemoryRecordStore::new();
    seed(&store, "good", "Kept", "2025-02-16 08-00-00");
    store
        .set(&StorePath::memory("scalar").unwrap(), json!(42))
        .unwrap();
    store
        .set(
            &StorePath::memory("bad").unwrap(),
            json!({ "topic": 7, "timestamp": "2025-02-16 09-00-00" }),
        )
        .unwrap();

    let mut feed = MemoryFeed::new(FeedView::All);
    feed.attach(&store).unwrap();
    let state = feed.state();
    assert_eq!(ids(&state), vec!["bad", "good"]);
    assert_eq!(state.records[0].topic, "7");
}
