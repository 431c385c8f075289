//! Per-record illustration resolution state.
//!
//! # Invariants
//! - An image problem never removes a record; it only selects the placeholder.
//! - Once a URL is reported loaded it stays `Ready` for the session.

use crate::model::memory::MemoryRecord;
use std::collections::HashSet;

/// What a card should show in its illustration slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    /// URL known, not yet reported loaded. Placeholder stays visible.
    Loading,
    /// URL loaded successfully.
    Ready,
    /// No URL, or the URL failed to resolve.
    Placeholder,
}

/// Session cache of image load outcomes, keyed by URL.
#[derive(Debug, Default)]
pub struct ImageLoadTracker {
    loaded: HashSet<String>,
    failed: HashSet<String>,
}

impl ImageLoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_loaded(&mut self, url: &str) {
        self.failed.remove(url);
        self.loaded.insert(url.to_string());
    }

    pub fn mark_failed(&mut self, url: &str) {
        if !self.loaded.contains(url) {
            self.failed.insert(url.to_string());
        }
    }

    pub fn status_for(&self, record: &MemoryRecord) -> ImageStatus {
        match record.image_url() {
            None => ImageStatus::Placeholder,
            Some(url) if self.loaded.contains(url) => ImageStatus::Ready,
            Some(url) if self.failed.contains(url) => ImageStatus::Placeholder,
            Some(_) => ImageStatus::Loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageLoadTracker, ImageStatus};
    use crate::model::memory::MemoryRecord;

    fn record_with_image(url: Option<&str>) -> MemoryRecord {
        let mut record = MemoryRecord::new("a", "topic", "2025-02-16 06-33-16");
        record.image_url = url.map(str::to_string);
        record
    }

    #[test]
    fn missing_url_is_placeholder() {
        let tracker = ImageLoadTracker::new();
        assert_eq!(
            tracker.status_for(&record_with_image(None)),
            ImageStatus::Placeholder
        );
    }

    #[test]
    fn status_follows_load_outcomes() {
        let mut tracker = ImageLoadTracker::new();
        let record = record_with_image(Some("https://img/a.png"));
        assert_eq!(tracker.status_for(&record), ImageStatus::Loading);

        tracker.mark_failed("https://img/a.png");
        assert_eq!(tracker.status_for(&record), ImageStatus::Placeholder);

        tracker.mark_loaded("https://img/a.png");
        assert_eq!(tracker.status_for(&record), ImageStatus::Ready);

        tracker.mark_failed("https://img/a.png");
        assert_eq!(tracker.status_for(&record), ImageStatus::Ready);
    }
}
