//! Wish-list use-case service.

use crate::model::wish::{Wish, WishId};
use crate::realtime::{ChangeHub, Resource};
use crate::repo::wish_repo::{WishListQuery, WishRepository};
use crate::repo::RepoResult;
use chrono::NaiveDate;
use std::sync::Arc;

/// Use-case facade for the shared wish list.
pub struct WishService<R: WishRepository> {
    repo: R,
    hub: Option<Arc<ChangeHub>>,
}

impl<R: WishRepository> WishService<R> {
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

    /// Adds an open wish and returns the stored record.
    pub fn add_wish(
        &self,
        title: impl Into<String>,
        note: Option<String>,
    ) -> RepoResult<Wish> {
        let mut wish = Wish::new(title);
        wish.note = note;

        self.repo.create_wish(&wish)?;
        self.announce();
        Ok(wish)
    }

    /// Marks a wish as come true. Calling twice keeps the first date.
    pub fn fulfill_wish(&self, id: WishId, on: NaiveDate) -> RepoResult<Wish> {
        let wish = self.repo.fulfill_wish(id, on)?;
        self.announce();
        Ok(wish)
    }

    pub fn open_wishes(&self) -> RepoResult<Vec<Wish>> {
        self.repo.list_wishes(&WishListQuery {
            only_open: true,
            ..WishListQuery::default()
        })
    }

    pub fn all_wishes(&self) -> RepoResult<Vec<Wish>> {
        self.repo.list_wishes(&WishListQuery::default())
    }

    pub fn remove_wish(&self, id: WishId) -> RepoResult<()> {
        self.repo.soft_delete_wish(id)?;
        self.announce();
        Ok(())
    }

    fn announce(&self) {
        if let Some(hub) = &self.hub {
            hub.notify(Resource::Wishes);
        }
    }
}
