//! Daily review flow over today's memories.

pub mod queue;

pub use queue::{QueuePosition, RejectOutcome, ReviewError, ReviewQueue, ReviewSummary};
