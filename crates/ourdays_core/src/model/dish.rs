//! Menu dish record for the food-ordering mini-app.

use crate::model::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a dish.
pub type DishId = Uuid;

/// One orderable dish on the home menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub uuid: DishId,
    pub name: String,
    /// Price in love points. Zero is a valid price.
    pub price_points: i64,
    /// Free-form menu section, e.g. "main" or "dessert".
    pub category: String,
    pub photo_path: Option<String>,
    /// Unavailable dishes stay on the menu but cannot be ordered.
    pub is_available: bool,
    pub is_deleted: bool,
}

impl Dish {
    pub fn new(name: impl Into<String>, price_points: i64, category: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, price_points, category)
    }

    pub fn with_id(
        uuid: DishId,
        name: impl Into<String>,
        price_points: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            name: name.into(),
            price_points,
            category: category.into(),
            photo_path: None,
            is_available: true,
            is_deleted: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("dish", "name", &self.name)?;
        require_text("dish", "category", &self.category)?;
        if self.price_points < 0 {
            return Err(ValidationError::NegativePoints {
                entity: "dish",
                value: self.price_points,
            });
        }
        Ok(())
    }
}
