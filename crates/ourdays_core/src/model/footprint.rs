//! Footprint record for the shared map.
//!
//! # Invariants
//! - Coordinates are WGS-84 (`Wgs84Point`); a display-system point can not
//!   be stored without an explicit conversion through `geo`.

use crate::geo::Wgs84Point;
use crate::model::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a footprint.
pub type FootprintId = Uuid;

/// One visited place pinned on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub uuid: FootprintId,
    pub title: String,
    pub note: Option<String>,
    pub visited_on: NaiveDate,
    /// Storage-system coordinates, always WGS-84.
    pub location: Wgs84Point,
    pub is_deleted: bool,
}

impl Footprint {
    pub fn new(title: impl Into<String>, location: Wgs84Point, visited_on: NaiveDate) -> Self {
        Self::with_id(Uuid::new_v4(), title, location, visited_on)
    }

    pub fn with_id(
        uuid: FootprintId,
        title: impl Into<String>,
        location: Wgs84Point,
        visited_on: NaiveDate,
    ) -> Self {
        Self {
            uuid,
            title: title.into(),
            note: None,
            visited_on,
            location,
            is_deleted: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("footprint", "title", &self.title)?;
        if !(-180.0..=180.0).contains(&self.location.lng) {
            return Err(ValidationError::CoordinateOutOfRange {
                axis: "longitude",
                value: self.location.lng,
            });
        }
        if !(-90.0..=90.0).contains(&self.location.lat) {
            return Err(ValidationError::CoordinateOutOfRange {
                axis: "latitude",
                value: self.location.lat,
            });
        }
        Ok(())
    }
}
