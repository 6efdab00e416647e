//! Menu dish repository contract and SQLite implementation.
//!
//! # Invariants
//! - Menu listing is ordered by `category ASC, name ASC, uuid ASC`.
//! - Availability is a flag flip, not a delete; sold-out dishes keep history.

use crate::model::dish::{Dish, DishId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const DISH_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    price_points,
    category,
    photo_path,
    is_available,
    is_deleted
FROM dishes";

/// Query options for listing menu dishes.
#[derive(Debug, Clone, Default)]
pub struct DishListQuery {
    /// When set, only dishes that can currently be ordered.
    pub available_only: bool,
    /// Optional exact category filter.
    pub category: Option<String>,
    pub include_deleted: bool,
}

/// Repository interface for the menu.
pub trait DishRepository {
    fn create_dish(&self, dish: &Dish) -> RepoResult<DishId>;
    fn update_dish(&self, dish: &Dish) -> RepoResult<()>;
    fn get_dish(&self, id: DishId, include_deleted: bool) -> RepoResult<Option<Dish>>;
    fn list_dishes(&self, query: &DishListQuery) -> RepoResult<Vec<Dish>>;
    fn set_dish_available(&self, id: DishId, available: bool) -> RepoResult<()>;
    fn soft_delete_dish(&self, id: DishId) -> RepoResult<()>;
}

/// SQLite-backed dish repository.
pub struct SqliteDishRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDishRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["dishes"])?;
        Ok(Self { conn })
    }
}

impl DishRepository for SqliteDishRepository<'_> {
    fn create_dish(&self, dish: &Dish) -> RepoResult<DishId> {
        dish.validate()?;

        self.conn.execute(
            "INSERT INTO dishes
                (uuid, name, price_points, category, photo_path, is_available, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                dish.uuid.to_string(),
                dish.name.as_str(),
                dish.price_points,
                dish.category.as_str(),
                dish.photo_path.as_deref(),
                bool_to_int(dish.is_available),
                bool_to_int(dish.is_deleted),
            ],
        )?;

        Ok(dish.uuid)
    }

    fn update_dish(&self, dish: &Dish) -> RepoResult<()> {
        dish.validate()?;

        let changed = self.conn.execute(
            "UPDATE dishes
             SET
                name = ?1,
                price_points = ?2,
                category = ?3,
                photo_path = ?4,
                is_available = ?5,
                is_deleted = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                dish.name.as_str(),
                dish.price_points,
                dish.category.as_str(),
                dish.photo_path.as_deref(),
                bool_to_int(dish.is_available),
                bool_to_int(dish.is_deleted),
                dish.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "dish",
                key: dish.uuid.to_string(),
            });
        }

        Ok(())
    }

    fn get_dish(&self, id: DishId, include_deleted: bool) -> RepoResult<Option<Dish>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DISH_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_dish_row(row)?));
        }

        Ok(None)
    }

    fn list_dishes(&self, query: &DishListQuery) -> RepoResult<Vec<Dish>> {
        let mut sql = format!("{DISH_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if query.available_only {
            sql.push_str(" AND is_available = 1");
        }
        if let Some(category) = query.category.as_ref() {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.clone()));
        }

        sql.push_str(" ORDER BY category ASC, name ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut dishes = Vec::new();

        while let Some(row) = rows.next()? {
            dishes.push(parse_dish_row(row)?);
        }

        Ok(dishes)
    }

    fn set_dish_available(&self, id: DishId, available: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE dishes
             SET
                is_available = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![id.to_string(), bool_to_int(available)],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "dish",
                key: id.to_string(),
            });
        }

        Ok(())
    }

    fn soft_delete_dish(&self, id: DishId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE dishes
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "dish",
                key: id.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_dish_row(row: &Row<'_>) -> RepoResult<Dish> {
    let uuid_text: String = row.get("uuid")?;

    let dish = Dish {
        uuid: parse_uuid(&uuid_text, "dishes.uuid")?,
        name: row.get("name")?,
        price_points: row.get("price_points")?,
        category: row.get("category")?,
        photo_path: row.get("photo_path")?,
        is_available: parse_bool(row.get("is_available")?, "dishes.is_available")?,
        is_deleted: parse_bool(row.get("is_deleted")?, "dishes.is_deleted")?,
    };
    dish.validate()?;
    Ok(dish)
}
