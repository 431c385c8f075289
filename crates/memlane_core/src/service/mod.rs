//! Use-case services over local repositories.

pub mod note_draft_service;
