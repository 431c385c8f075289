//! Pure snapshot-to-list derivations for the memory views.
//!
//! # Invariants
//! - Absent or non-object payloads derive an empty list.
//! - "All" order is newest first by parsed timestamp; the sort is stable and
//!   records with unparseable timestamps keep their relative order at the end.
//! - "Today" keeps store iteration order.

use crate::model::memory::MemoryRecord;
use crate::model::timestamp::{date_prefix, MemoryTimestamp};
use crate::store::StoreSnapshot;
use chrono::NaiveDate;
use log::warn;
use serde_json::Value;

/// Converts a collection snapshot into records, keyed by store key.
pub fn records_from_snapshot(snapshot: &StoreSnapshot) -> Vec<MemoryRecord> {
    let Some(value) = snapshot.value() else {
        return Vec::new();
    };
    let Value::Object(entries) = value else {
        warn!(
            "event=feed_decode module=feed status=error path={} error_code=payload_not_object",
            snapshot.path()
        );
        return Vec::new();
    };

    let mut records = Vec::with_capacity(entries.len());
    for (key, body) in entries {
        if !body.is_object() {
            warn!(
                "event=feed_decode module=feed status=skipped path={} error_code=record_not_object",
                snapshot.path()
            );
            continue;
        }
        match serde_json::from_value::<MemoryRecord>(body.clone()) {
            Ok(mut record) => {
                record.id = key.clone();
                records.push(record);
            }
            Err(err) => {
                warn!(
                    "event=feed_decode module=feed status=skipped path={} error_code=record_invalid error={}",
                    snapshot.path(),
                    err
                );
            }
        }
    }
    records
}

/// Derives the "all" view: every record, newest first.
pub fn derive_all(snapshot: &StoreSnapshot) -> Vec<MemoryRecord> {
    let mut records = records_from_snapshot(snapshot);
    sort_newest_first(&mut records);
    records
}

/// Derives the "today" view: records dated `today`, in store order.
pub fn derive_today(snapshot: &StoreSnapshot, today: NaiveDate) -> Vec<MemoryRecord> {
    filter_on_date(records_from_snapshot(snapshot), today)
}

/// Stable newest-first sort on parsed timestamps.
pub fn sort_newest_first(records: &mut [MemoryRecord]) {
    records.sort_by_cached_key(|record| std::cmp::Reverse(sort_key(record)));
}

/// Keeps records whose timestamp starts with the `YYYY-MM-DD` of `date`.
pub fn filter_on_date(records: Vec<MemoryRecord>, date: NaiveDate) -> Vec<MemoryRecord> {
    let prefix = date_prefix(date);
    records
        .into_iter()
        .filter(|record| record.is_on_date(&prefix))
        .collect()
}

fn sort_key(record: &MemoryRecord) -> Option<MemoryTimestamp> {
    record.parsed_timestamp().ok()
}
