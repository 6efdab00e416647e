//! Domain records for the shared dashboard.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Validate records before they reach a persistence boundary.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - User-visible records are soft-deleted via tombstones, not hard deleted.
//! - Footprint coordinates are WGS-84; the display system never appears in
//!   a model type.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dish;
pub mod footprint;
pub mod memory;
pub mod order;
pub mod points;
pub mod wish;

/// Validation failure raised before any SQL mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    /// A point amount that must be non-negative is below zero.
    NegativePoints { entity: &'static str, value: i64 },
    /// A point amount that must be strictly positive is not.
    NonPositiveAmount { value: i64 },
    /// An order draft contains no lines.
    EmptyOrder,
    /// An order line quantity must be at least one.
    NonPositiveQuantity { line: usize, quantity: i64 },
    /// A latitude or longitude is outside its plausible range.
    CoordinateOutOfRange { axis: &'static str, value: f64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity}.{field} must not be empty")
            }
            Self::NegativePoints { entity, value } => {
                write!(f, "{entity} points must be non-negative, got {value}")
            }
            Self::NonPositiveAmount { value } => {
                write!(f, "point amount must be positive, got {value}")
            }
            Self::EmptyOrder => write!(f, "order must contain at least one line"),
            Self::NonPositiveQuantity { line, quantity } => {
                write!(f, "order line {line} quantity must be positive, got {quantity}")
            }
            Self::CoordinateOutOfRange { axis, value } => {
                write!(f, "{axis} {value} is outside the plausible range")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}
