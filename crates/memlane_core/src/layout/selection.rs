//! Card selection state for the memory views.
//!
//! Pinning (single select) and the detail view (double select) are
//! independent; changing one never touches the other.

use crate::model::memory::MemoryId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSelection {
    pinned: Option<MemoryId>,
    detail: Option<MemoryId>,
}

impl CardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `id`, or unpins it when it is already pinned.
    pub fn toggle_pin(&mut self, id: &str) {
        if self.pinned.as_deref() == Some(id) {
            self.pinned = None;
        } else {
            self.pinned = Some(id.to_string());
        }
    }

    pub fn clear_pin(&mut self) {
        self.pinned = None;
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.as_deref() == Some(id)
    }

    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    pub fn open_detail(&mut self, id: &str) {
        self.detail = Some(id.to_string());
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
