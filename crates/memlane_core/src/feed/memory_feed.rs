//! Live memory list bound to one store subscription.
//!
//! # Responsibility
//! - Subscribe to the `memories` collection and derive the view list on
//!   every snapshot.
//! - Notify registered listeners with the derived state.
//! - Release the subscription when detached or dropped.
//!
//! # Invariants
//! - `is_loading` is true from attach until the first snapshot, then false for
//!   the rest of that subscription.
//! - Snapshots delivered for an older subscription are discarded.
//! - Fetched records are never mutated locally.

use crate::clock::{Clock, SystemClock};
use crate::feed::derive::{derive_all, derive_today};
use crate::model::memory::MemoryRecord;
use crate::store::{RecordStore, StorePath, StoreResult, StoreSnapshot, Subscription};
use log::{error, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Which derived list a feed produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedView {
    /// Every record, newest first.
    All,
    /// Records dated today, in store order.
    Today,
}

impl FeedView {
    fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
        }
    }
}

/// Derived list plus loading flag, as seen by feed consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    pub records: Vec<MemoryRecord>,
    pub is_loading: bool,
}

impl FeedState {
    fn loading() -> Self {
        Self {
            records: Vec::new(),
            is_loading: true,
        }
    }

    /// True once loaded with nothing to show ("no memories yet").
    pub fn is_empty_loaded(&self) -> bool {
        !self.is_loading && self.records.is_empty()
    }
}

/// Listener invoked after every derived update.
pub type FeedListener = Arc<dyn Fn(&FeedState) + Send + Sync>;

struct FeedShared {
    view: FeedView,
    clock: Arc<dyn Clock>,
    state: Mutex<FeedState>,
    listeners: Mutex<Vec<FeedListener>>,
    generation: AtomicU64,
}

impl FeedShared {
    fn apply(&self, generation: u64, snapshot: &StoreSnapshot) {
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        let records = match self.view {
            FeedView::All => derive_all(snapshot),
            FeedView::Today => derive_today(snapshot, self.clock.today()),
        };
        info!(
            "event=feed_snapshot module=feed status=ok view={} record_count={}",
            self.view.label(),
            records.len()
        );

        let next = FeedState {
            records,
            is_loading: false,
        };
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next.clone();

        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(&next);
        }
    }
}

/// Reactive memory list for one view.
pub struct MemoryFeed {
    shared: Arc<FeedShared>,
    subscription: Option<Subscription>,
}

impl MemoryFeed {
    /// Creates a detached feed using the local system date.
    pub fn new(view: FeedView) -> Self {
        Self::with_clock(view, Arc::new(SystemClock))
    }

    /// Creates a detached feed with an explicit date source.
    pub fn with_clock(view: FeedView, clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(FeedShared {
                view,
                clock,
                state: Mutex::new(FeedState::loading()),
                listeners: Mutex::new(Vec::new()),
                generation: AtomicU64::new(0),
            }),
            subscription: None,
        }
    }

    pub fn view(&self) -> FeedView {
        self.shared.view
    }

    /// Registers a listener for subsequent updates.
    pub fn on_update(&self, listener: impl Fn(&FeedState) + Send + Sync + 'static) {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// Subscribes to the `memories` collection of `store`.
    ///
    /// An existing subscription is released first and the feed returns to the
    /// loading state until the new subscription delivers.
    ///
    /// # Errors
    /// - Returns the store error when the subscription cannot be established;
    ///   the feed then stays in the loading state.
    pub fn attach<S: RecordStore + ?Sized>(&mut self, store: &S) -> StoreResult<()> {
        self.detach();
        *self.shared.state.lock().unwrap_or_else(PoisonError::into_inner) = FeedState::loading();
        let generation = self.shared.generation.load(Ordering::SeqCst);

        let weak: Weak<FeedShared> = Arc::downgrade(&self.shared);
        let callback = Arc::new(move |snapshot: &StoreSnapshot| {
            if let Some(shared) = weak.upgrade() {
                shared.apply(generation, snapshot);
            }
        });

        match store.subscribe(&StorePath::memories(), callback) {
            Ok(subscription) => {
                info!(
                    "event=feed_attach module=feed status=ok view={}",
                    self.shared.view.label()
                );
                self.subscription = Some(subscription);
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=feed_attach module=feed status=error view={} error={}",
                    self.shared.view.label(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Releases the store subscription. Late snapshots are ignored.
    pub fn detach(&mut self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            info!(
                "event=feed_detach module=feed status=ok view={}",
                self.shared.view.label()
            );
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Current derived state.
    pub fn state(&self) -> FeedState {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn records(&self) -> Vec<MemoryRecord> {
        self.state().records
    }

    pub fn is_loading(&self) -> bool {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading
    }
}

impl Drop for MemoryFeed {
    fn drop(&mut self) {
        self.detach();
    }
}
