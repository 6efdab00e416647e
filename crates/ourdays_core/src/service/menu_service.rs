//! Menu management use-case service.

use crate::model::dish::{Dish, DishId};
use crate::realtime::{ChangeHub, Resource};
use crate::repo::dish_repo::{DishListQuery, DishRepository};
use crate::repo::RepoResult;
use std::sync::Arc;

/// Request model for adding a dish to the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDish {
    pub name: String,
    pub price_points: i64,
    pub category: String,
    pub photo_path: Option<String>,
}

/// Use-case facade for the home menu.
pub struct MenuService<R: DishRepository> {
    repo: R,
    hub: Option<Arc<ChangeHub>>,
}

impl<R: DishRepository> MenuService<R> {
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

    /// Adds an available dish and returns the stored record.
    pub fn add_dish(&self, request: &NewDish) -> RepoResult<Dish> {
        let mut dish = Dish::new(
            request.name.clone(),
            request.price_points,
            request.category.clone(),
        );
        dish.photo_path = request.photo_path.clone();

        self.repo.create_dish(&dish)?;
        self.announce();
        Ok(dish)
    }

    pub fn update_dish(&self, dish: &Dish) -> RepoResult<()> {
        self.repo.update_dish(dish)?;
        self.announce();
        Ok(())
    }

    pub fn get_dish(&self, id: DishId) -> RepoResult<Option<Dish>> {
        self.repo.get_dish(id, false)
    }

    /// What can be ordered right now.
    pub fn menu(&self) -> RepoResult<Vec<Dish>> {
        self.repo.list_dishes(&DishListQuery {
            available_only: true,
            ..DishListQuery::default()
        })
    }

    /// Full menu including sold-out dishes, for the admin view.
    pub fn full_menu(&self) -> RepoResult<Vec<Dish>> {
        self.repo.list_dishes(&DishListQuery::default())
    }

    /// Flips availability without touching the rest of the dish.
    pub fn set_available(&self, id: DishId, available: bool) -> RepoResult<()> {
        self.repo.set_dish_available(id, available)?;
        self.announce();
        Ok(())
    }

    pub fn remove_dish(&self, id: DishId) -> RepoResult<()> {
        self.repo.soft_delete_dish(id)?;
        self.announce();
        Ok(())
    }

    fn announce(&self) {
        if let Some(hub) = &self.hub {
            hub.notify(Resource::Dishes);
        }
    }
}
