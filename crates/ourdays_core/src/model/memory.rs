//! Timeline memory record.
//!
//! # Responsibility
//! - Represent one remembered moment on the shared timeline.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another memory.
//! - `is_deleted` is the source of truth for tombstone state.

use crate::model::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a timeline memory.
pub type MemoryId = Uuid;

/// One entry on the memory timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub uuid: MemoryId,
    pub title: String,
    /// Optional longer text shown under the title.
    pub note: Option<String>,
    /// Calendar day the memory happened on; drives timeline ordering.
    pub happened_on: NaiveDate,
    /// Path to an attached photo, if one was uploaded.
    pub photo_path: Option<String>,
    pub is_deleted: bool,
}

impl Memory {
    /// Creates a memory with a generated stable ID.
    pub fn new(title: impl Into<String>, happened_on: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4(), title, happened_on)
    }

    /// Creates a memory with a caller-provided stable ID (import paths).
    pub fn with_id(uuid: MemoryId, title: impl Into<String>, happened_on: NaiveDate) -> Self {
        Self {
            uuid,
            title: title.into(),
            note: None,
            happened_on,
            photo_path: None,
            is_deleted: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("memory", "title", &self.title)
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
