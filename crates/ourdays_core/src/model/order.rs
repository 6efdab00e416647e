//! Order records and the status lifecycle.
//!
//! # Responsibility
//! - Shape the order draft callers submit and the persisted order read model.
//! - Define which status transitions are legal.
//!
//! # Invariants
//! - Line prices and quantities are captured at order time; later menu edits
//!   never change a placed order.
//! - `total_points()` is the only way a draft's total is computed.

use crate::model::dish::DishId;
use crate::model::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an order.
pub type OrderId = Uuid;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, waiting for the chef.
    Pending,
    /// Chef started working on it.
    Accepted,
    /// Delivered to the table; terminal happy path.
    Served,
    /// Abandoned before serving; paid points are refunded.
    Cancelled,
}

impl OrderStatus {
    /// Whether moving from `self` to `to` is a legal lifecycle step.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Accepted)
                | (Self::Accepted, Self::Served)
                | (Self::Pending, Self::Cancelled)
                | (Self::Accepted, Self::Cancelled)
        )
    }
}

/// One line of an order. `dish` is `None` for free-form custom items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub dish: Option<DishId>,
    pub name: String,
    pub price_points: i64,
    pub quantity: i64,
}

impl OrderLine {
    pub fn for_dish(dish: DishId, name: impl Into<String>, price_points: i64, quantity: i64) -> Self {
        Self {
            dish: Some(dish),
            name: name.into(),
            price_points,
            quantity,
        }
    }

    pub fn custom(name: impl Into<String>, price_points: i64, quantity: i64) -> Self {
        Self {
            dish: None,
            name: name.into(),
            price_points,
            quantity,
        }
    }

    pub fn line_total(&self) -> i64 {
        self.price_points * self.quantity
    }
}

/// What a caller submits to place an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Member placing (and paying for) the order.
    pub ordered_by: String,
    pub note: Option<String>,
    pub lines: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn new(ordered_by: impl Into<String>) -> Self {
        Self {
            ordered_by: ordered_by.into(),
            note: None,
            lines: Vec::new(),
        }
    }

    /// Sum of all line totals.
    pub fn total_points(&self) -> i64 {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("order", "ordered_by", &self.ordered_by)?;
        if self.lines.is_empty() {
            return Err(ValidationError::EmptyOrder);
        }
        for (index, line) in self.lines.iter().enumerate() {
            require_text("order_line", "name", &line.name)?;
            if line.price_points < 0 {
                return Err(ValidationError::NegativePoints {
                    entity: "order_line",
                    value: line.price_points,
                });
            }
            if line.quantity <= 0 {
                return Err(ValidationError::NonPositiveQuantity {
                    line: index,
                    quantity: line.quantity,
                });
            }
        }
        Ok(())
    }
}

/// Persisted order as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub uuid: OrderId,
    pub ordered_by: String,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub total_points: i64,
    pub lines: Vec<OrderLine>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds of the last status change.
    pub updated_at: i64,
}
