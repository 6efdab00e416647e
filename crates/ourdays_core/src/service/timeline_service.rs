//! Memory timeline use-case service.

use crate::model::memory::{Memory, MemoryId};
use crate::realtime::{ChangeHub, Resource};
use crate::repo::memory_repo::{MemoryListQuery, MemoryRepository};
use crate::repo::RepoResult;
use chrono::NaiveDate;
use std::sync::Arc;

/// Request model for adding a timeline memory.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMemory {
    pub title: String,
    pub note: Option<String>,
    pub happened_on: NaiveDate,
    pub photo_path: Option<String>,
}

/// Use-case facade for the memory timeline.
pub struct TimelineService<R: MemoryRepository> {
    repo: R,
    hub: Option<Arc<ChangeHub>>,
}

impl<R: MemoryRepository> TimelineService<R> {
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

    /// Adds a memory and returns the stored record.
    pub fn add_memory(&self, request: &NewMemory) -> RepoResult<Memory> {
        let mut memory = Memory::new(request.title.clone(), request.happened_on);
        memory.note = request.note.clone();
        memory.photo_path = request.photo_path.clone();

        self.repo.create_memory(&memory)?;
        self.announce();
        Ok(memory)
    }

    /// Replaces a memory's fields fully.
    pub fn update_memory(&self, memory: &Memory) -> RepoResult<()> {
        self.repo.update_memory(memory)?;
        self.announce();
        Ok(())
    }

    pub fn get_memory(&self, id: MemoryId) -> RepoResult<Option<Memory>> {
        self.repo.get_memory(id, false)
    }

    /// Timeline page, newest happenings first.
    pub fn timeline(&self, query: &MemoryListQuery) -> RepoResult<Vec<Memory>> {
        self.repo.list_memories(query)
    }

    pub fn remove_memory(&self, id: MemoryId) -> RepoResult<()> {
        self.repo.soft_delete_memory(id)?;
        self.announce();
        Ok(())
    }

    fn announce(&self) {
        if let Some(hub) = &self.hub {
            hub.notify(Resource::Memories);
        }
    }
}
