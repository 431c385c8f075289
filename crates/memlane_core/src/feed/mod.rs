//! Memory feed: store snapshots to ordered view lists.
//!
//! # Responsibility
//! - Normalize store snapshots into `MemoryRecord` lists.
//! - Keep one live subscription per consuming view.
//!
//! # See also
//! - `crate::review` and `crate::layout`, which consume the derived lists.

pub mod derive;
pub mod memory_feed;

pub use derive::{
    derive_all, derive_today, filter_on_date, records_from_snapshot, sort_newest_first,
};
pub use memory_feed::{FeedListener, FeedState, FeedView, MemoryFeed};
