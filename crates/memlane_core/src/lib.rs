//! Core domain logic for Memlane, a personal memory archive.
//! This crate is the single source of truth for feed ordering, review
//! decisions and card layout.

pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod feed;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod review;
pub mod service;
pub mod store;

pub use api::{ApiError, ApiOperation, ApiResult, GenerateImagesResponse, MemoryApiClient};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ClientConfig, ConfigError};
pub use feed::{FeedState, FeedView, MemoryFeed};
pub use layout::{CardPlacement, CardSelection, ScatterLayout, ScatterPosition};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::image::{ImageLoadTracker, ImageStatus};
pub use model::memory::{MemoryDetail, MemoryId, MemoryMetadata, MemoryRecord};
pub use model::timestamp::{MemoryTimestamp, TimestampParseError};
pub use repo::local_state_repo::{
    LocalStateRepository, RepoError, RepoResult, SqliteLocalStateRepository,
};
pub use review::{QueuePosition, RejectOutcome, ReviewError, ReviewQueue, ReviewSummary};
pub use service::note_draft_service::{NoteDraftService, RECORD_NOTE_KEY};
pub use store::{
    InMemoryRecordStore, RecordStore, RestRecordStore, StoreError, StorePath, StoreResult,
    StoreSnapshot, Subscription,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
