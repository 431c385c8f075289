//! One-at-a-time keep/reject review over today's memories.
//!
//! # Responsibility
//! - Walk the entry-time list with a forward-only cursor.
//! - Delete rejected records from the store without blocking progress.
//!
//! # Invariants
//! - The reviewed list is fixed at entry; later feed emissions do not shift
//!   the cursor.
//! - The cursor never decreases and never exceeds the list length.
//! - `kept + rejected == total` for every summary, `total` fixed at entry.
//! - A failed delete still counts as a rejection and still advances.

use crate::model::memory::{MemoryId, MemoryRecord};
use crate::store::{RecordStore, StoreError, StorePath};
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Queue navigation errors. None of them change queue state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// The cursor is already past the last record.
    Exhausted,
    /// `reject` named a record other than the one under the cursor.
    NotCurrent { expected: MemoryId, actual: MemoryId },
}

impl Display for ReviewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted => write!(f, "review queue is exhausted"),
            Self::NotCurrent { expected, actual } => write!(
                f,
                "cannot reject `{actual}`: current record is `{expected}`"
            ),
        }
    }
}

impl Error for ReviewError {}

/// Decision counts for the review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Records still present (not rejected).
    pub kept: usize,
    pub rejected: usize,
    /// Records in the queue at entry.
    pub total: usize,
}

/// What the review view should show.
#[derive(Debug, PartialEq, Eq)]
pub enum QueuePosition<'a> {
    Current(&'a MemoryRecord),
    Exhausted(ReviewSummary),
}

/// Result of a reject whose state transition already happened.
#[derive(Debug)]
pub enum RejectOutcome {
    Deleted,
    /// Delete request failed; the rejection still stands locally.
    DeleteFailed(StoreError),
}

impl RejectOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Review session over an entry-time snapshot of today's records.
pub struct ReviewQueue<S: RecordStore> {
    store: S,
    entries: Vec<MemoryRecord>,
    cursor: usize,
    rejected_ids: BTreeSet<MemoryId>,
}

impl<S: RecordStore> ReviewQueue<S> {
    /// Enters the queue with a fresh cursor and no rejections.
    pub fn enter(store: S, records: Vec<MemoryRecord>) -> Self {
        info!(
            "event=review_enter module=review status=ok total={}",
            records.len()
        );
        Self {
            store,
            entries: records,
            cursor: 0,
            rejected_ids: BTreeSet::new(),
        }
    }

    /// Re-enters the view with a new list, resetting cursor and rejections.
    pub fn reset(&mut self, records: Vec<MemoryRecord>) {
        info!(
            "event=review_enter module=review status=ok total={} reentry=true",
            records.len()
        );
        self.entries = records;
        self.cursor = 0;
        self.rejected_ids.clear();
    }

    pub fn current(&self) -> QueuePosition<'_> {
        match self.entries.get(self.cursor) {
            Some(record) => QueuePosition::Current(record),
            None => QueuePosition::Exhausted(self.summary()),
        }
    }

    pub fn current_record(&self) -> Option<&MemoryRecord> {
        self.entries.get(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Keeps the current record and moves to the next one.
    ///
    /// # Errors
    /// - `ReviewError::Exhausted` when there is no current record.
    pub fn advance(&mut self) -> Result<(), ReviewError> {
        if self.is_exhausted() {
            return Err(ReviewError::Exhausted);
        }
        self.cursor += 1;
        Ok(())
    }

    /// Rejects the current record: records the rejection, requests the store
    /// delete, then advances regardless of the delete result.
    ///
    /// # Errors
    /// - `ReviewError::Exhausted` when there is no current record.
    /// - `ReviewError::NotCurrent` when `id` is not the current record.
    pub fn reject(&mut self, id: &str) -> Result<RejectOutcome, ReviewError> {
        let current_id = match self.current_record() {
            Some(record) => record.id.clone(),
            None => return Err(ReviewError::Exhausted),
        };
        if current_id != id {
            return Err(ReviewError::NotCurrent {
                expected: current_id,
                actual: id.to_string(),
            });
        }

        self.rejected_ids.insert(current_id.clone());
        let outcome = match StorePath::memory(&current_id)
            .and_then(|path| self.store.delete(&path))
        {
            Ok(()) => {
                info!("event=review_reject module=review status=ok cursor={}", self.cursor);
                RejectOutcome::Deleted
            }
            Err(err) => {
                warn!(
                    "event=review_reject module=review status=degraded cursor={} error_code=delete_failed error={}",
                    self.cursor, err
                );
                RejectOutcome::DeleteFailed(err)
            }
        };
        self.cursor += 1;
        Ok(outcome)
    }

    /// Decision counts; valid at any point after entry.
    pub fn summary(&self) -> ReviewSummary {
        let total = self.entries.len();
        let rejected = self.rejected_ids.len();
        ReviewSummary {
            kept: total - rejected,
            rejected,
            total,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn rejected_ids(&self) -> &BTreeSet<MemoryId> {
        &self.rejected_ids
    }

    /// Records not rejected in this session, in queue order.
    pub fn remaining(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.entries
            .iter()
            .filter(|record| !self.rejected_ids.contains(&record.id))
    }

    /// Looks up a queued record for the detail view. Pure read.
    pub fn find(&self, id: &str) -> Option<&MemoryRecord> {
        self.entries.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
