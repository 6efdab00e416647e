//! Footprint map use-case service.
//!
//! # Responsibility
//! - Keep the storage/display coordinate boundary in one place: map input
//!   is converted to WGS-84 before it can reach the repository, and stored
//!   points are converted to the display system only when handed to the map.
//!
//! # Invariants
//! - Nothing below this layer ever sees a `Gcj02Point`.

use crate::geo::{Gcj02Point, Wgs84Point};
use crate::model::footprint::{Footprint, FootprintId};
use crate::realtime::{ChangeHub, Resource};
use crate::repo::footprint_repo::{FootprintListQuery, FootprintRepository};
use crate::repo::RepoResult;
use chrono::NaiveDate;
use std::sync::Arc;

/// Request model for pinning a footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFootprint {
    pub title: String,
    pub note: Option<String>,
    pub visited_on: NaiveDate,
}

/// Use-case facade for the shared map.
pub struct FootprintService<R: FootprintRepository> {
    repo: R,
    hub: Option<Arc<ChangeHub>>,
}

impl<R: FootprintRepository> FootprintService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, hub: None }
    }

    /// Creates a service that announces mutations on the given hub.
    pub fn with_hub(repo: R, hub: Arc<ChangeHub>) -> Self {
        Self {
            repo,
            hub: Some(hub),
        }
    }

    /// Adds a footprint from an already-storage-system location.
    pub fn add_visit(
        &self,
        request: &NewFootprint,
        location: Wgs84Point,
    ) -> RepoResult<Footprint> {
        let mut footprint = Footprint::new(request.title.clone(), location, request.visited_on);
        footprint.note = request.note.clone();

        self.repo.create_footprint(&footprint)?;
        self.announce();
        Ok(footprint)
    }

    /// Adds a footprint from a map tap, which arrives in the display system.
    pub fn pin_from_map(
        &self,
        request: &NewFootprint,
        tapped: Gcj02Point,
    ) -> RepoResult<Footprint> {
        self.add_visit(request, tapped.to_storage())
    }

    /// Replaces a footprint's fields fully.
    pub fn update_footprint(&self, footprint: &Footprint) -> RepoResult<()> {
        self.repo.update_footprint(footprint)?;
        self.announce();
        Ok(())
    }

    pub fn get_footprint(&self, id: FootprintId) -> RepoResult<Option<Footprint>> {
        self.repo.get_footprint(id, false)
    }

    /// All stored footprints, untouched WGS-84.
    pub fn visits(&self) -> RepoResult<Vec<Footprint>> {
        self.repo.list_footprints(&FootprintListQuery::default())
    }

    /// Footprints paired with their display-system coordinates for the map.
    pub fn display_pins(&self) -> RepoResult<Vec<(Footprint, Gcj02Point)>> {
        let footprints = self.visits()?;
        Ok(footprints
            .into_iter()
            .map(|footprint| {
                let shown = footprint.location.to_display();
                (footprint, shown)
            })
            .collect())
    }

    pub fn remove_footprint(&self, id: FootprintId) -> RepoResult<()> {
        self.repo.soft_delete_footprint(id)?;
        self.announce();
        Ok(())
    }

    fn announce(&self) {
        if let Some(hub) = &self.hub {
            hub.notify(Resource::Footprints);
        }
    }
}
