//! Core domain logic for OurDays, a couple's shared dashboard.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod flags;
pub mod geo;
pub mod logging;
pub mod model;
pub mod realtime;
pub mod repo;
pub mod service;

pub use calendar::{
    day_count, days_between, format_date, next_milestone, Milestone, MilestoneKind,
};
pub use config::CoreConfig;
pub use flags::{DailyFlag, FlagStore, MemoryFlagStore, SqliteFlagStore};
pub use geo::{gcj02_to_wgs84, wgs84_to_gcj02, Gcj02Point, Wgs84Point};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::dish::{Dish, DishId};
pub use model::footprint::{Footprint, FootprintId};
pub use model::memory::{Memory, MemoryId};
pub use model::order::{OrderDraft, OrderId, OrderLine, OrderRecord, OrderStatus};
pub use model::points::PointEntry;
pub use model::wish::{Wish, WishId};
pub use realtime::{ChangeHub, Resource, SubscriptionToken};
pub use repo::dish_repo::{DishListQuery, DishRepository, SqliteDishRepository};
pub use repo::footprint_repo::{
    FootprintListQuery, FootprintRepository, SqliteFootprintRepository,
};
pub use repo::memory_repo::{MemoryListQuery, MemoryRepository, SqliteMemoryRepository};
pub use repo::order_repo::{OrderListQuery, OrderRepository, SqliteOrderRepository};
pub use repo::points_repo::{PointsRepository, SqlitePointsRepository};
pub use repo::wish_repo::{SqliteWishRepository, WishListQuery, WishRepository};
pub use repo::{RepoError, RepoResult};
pub use service::footprint_service::{FootprintService, NewFootprint};
pub use service::menu_service::{MenuService, NewDish};
pub use service::order_service::OrderService;
pub use service::points_service::PointsService;
pub use service::timeline_service::{NewMemory, TimelineService};
pub use service::wish_service::WishService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
