//! Note draft use-case service.
//!
//! # Responsibility
//! - Load the single free-text note once when the record screen opens.
//! - Rewrite it on every edit.
//!
//! # Invariants
//! - The draft lives under the fixed key `RECORD_NOTE_KEY`.
//! - A missing draft loads as an empty string.

use crate::repo::local_state_repo::{LocalStateRepository, RepoResult};
use log::{debug, info};

pub const RECORD_NOTE_KEY: &str = "recordNote";

pub struct NoteDraftService<R: LocalStateRepository> {
    repo: R,
}

impl<R: LocalStateRepository> NoteDraftService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn load(&self) -> RepoResult<String> {
        let draft = self.repo.get_value(RECORD_NOTE_KEY)?.unwrap_or_default();
        info!(
            "event=note_load module=service status=ok chars={}",
            draft.chars().count()
        );
        Ok(draft)
    }

    /// Replaces the stored draft with `content`.
    pub fn save(&self, content: &str) -> RepoResult<()> {
        self.repo.put_value(RECORD_NOTE_KEY, content)?;
        debug!(
            "event=note_save module=service status=ok chars={}",
            content.chars().count()
        );
        Ok(())
    }

    pub fn clear(&self) -> RepoResult<()> {
        self.repo.delete_value(RECORD_NOTE_KEY)?;
        Ok(())
    }
}
