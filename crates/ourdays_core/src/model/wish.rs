//! Wish-list record.

use crate::model::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a wish.
pub type WishId = Uuid;

/// One wish on the shared list.
///
/// Fulfilling a wish is a one-way, idempotent operation; the record keeps
/// the day it came true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wish {
    pub uuid: WishId,
    pub title: String,
    pub note: Option<String>,
    pub is_fulfilled: bool,
    /// Set when `is_fulfilled` flips to true.
    pub fulfilled_on: Option<NaiveDate>,
    pub is_deleted: bool,
}

impl Wish {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    pub fn with_id(uuid: WishId, title: impl Into<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
            note: None,
            is_fulfilled: false,
            fulfilled_on: None,
            is_deleted: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("wish", "title", &self.title)
    }

    /// Marks the wish fulfilled on the given day. A second call keeps the
    /// original date.
    pub fn fulfill(&mut self, on: NaiveDate) {
        if !self.is_fulfilled {
            self.is_fulfilled = true;
            self.fulfilled_on = Some(on);
        }
    }
}
