//! Wish-list repository contract and SQLite implementation.
//!
//! # Invariants
//! - Fulfilling is idempotent: a second call never changes `fulfilled_on`.
//! - Open-wish listing excludes fulfilled rows, never deleted rows only.

use crate::model::wish::{Wish, WishId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_date, parse_uuid, RepoError,
    RepoResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const WISH_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    note,
    is_fulfilled,
    fulfilled_on,
    is_deleted
FROM wishes";

/// Query options for listing wishes.
#[derive(Debug, Clone, Default)]
pub struct WishListQuery {
    /// When set, only wishes that have not come true yet.
    pub only_open: bool,
    pub include_deleted: bool,
}

/// Repository interface for the wish list.
pub trait WishRepository {
    fn create_wish(&self, wish: &Wish) -> RepoResult<WishId>;
    fn update_wish(&self, wish: &Wish) -> RepoResult<()>;
    fn get_wish(&self, id: WishId, include_deleted: bool) -> RepoResult<Option<Wish>>;
    fn list_wishes(&self, query: &WishListQuery) -> RepoResult<Vec<Wish>>;
    /// Marks a wish fulfilled on `on` and returns the updated record.
    fn fulfill_wish(&self, id: WishId, on: NaiveDate) -> RepoResult<Wish>;
    fn soft_delete_wish(&self, id: WishId) -> RepoResult<()>;
}

/// SQLite-backed wish repository.
pub struct SqliteWishRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWishRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["wishes"])?;
        Ok(Self { conn })
    }
}

impl WishRepository for SqliteWishRepository<'_> {
    fn create_wish(&self, wish: &Wish) -> RepoResult<WishId> {
        wish.validate()?;

        self.conn.execute(
            "INSERT INTO wishes (uuid, title, note, is_fulfilled, fulfilled_on, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                wish.uuid.to_string(),
                wish.title.as_str(),
                wish.note.as_deref(),
                bool_to_int(wish.is_fulfilled),
                wish.fulfilled_on.map(|date| date.to_string()),
                bool_to_int(wish.is_deleted),
            ],
        )?;

        Ok(wish.uuid)
    }

    fn update_wish(&self, wish: &Wish) -> RepoResult<()> {
        wish.validate()?;

        let changed = self.conn.execute(
            "UPDATE wishes
             SET
                title = ?1,
                note = ?2,
                is_fulfilled = ?3,
                fulfilled_on = ?4,
                is_deleted = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                wish.title.as_str(),
                wish.note.as_deref(),
                bool_to_int(wish.is_fulfilled),
                wish.fulfilled_on.map(|date| date.to_string()),
                bool_to_int(wish.is_deleted),
                wish.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "wish",
                key: wish.uuid.to_string(),
            });
        }

        Ok(())
    }

    fn get_wish(&self, id: WishId, include_deleted: bool) -> RepoResult<Option<Wish>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WISH_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_wish_row(row)?));
        }

        Ok(None)
    }

    fn list_wishes(&self, query: &WishListQuery) -> RepoResult<Vec<Wish>> {
        let mut sql = format!("{WISH_SELECT_SQL} WHERE 1 = 1");

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if query.only_open {
            sql.push_str(" AND is_fulfilled = 0");
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut wishes = Vec::new();

        while let Some(row) = rows.next()? {
            wishes.push(parse_wish_row(row)?);
        }

        Ok(wishes)
    }

    fn fulfill_wish(&self, id: WishId, on: NaiveDate) -> RepoResult<Wish> {
        let changed = self.conn.execute(
            "UPDATE wishes
             SET
                is_fulfilled = 1,
                fulfilled_on = COALESCE(fulfilled_on, ?2),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![id.to_string(), on.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "wish",
                key: id.to_string(),
            });
        }

        self.get_wish(id, false)?.ok_or_else(|| {
            RepoError::InvalidData("fulfilled wish missing on read-back".to_string())
        })
    }

    fn soft_delete_wish(&self, id: WishId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE wishes
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "wish",
                key: id.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_wish_row(row: &Row<'_>) -> RepoResult<Wish> {
    let uuid_text: String = row.get("uuid")?;
    let fulfilled_on = match row.get::<_, Option<String>>("fulfilled_on")? {
        Some(text) => Some(parse_date(&text, "wishes.fulfilled_on")?),
        None => None,
    };

    let wish = Wish {
        uuid: parse_uuid(&uuid_text, "wishes.uuid")?,
        title: row.get("title")?,
        note: row.get("note")?,
        is_fulfilled: parse_bool(row.get("is_fulfilled")?, "wishes.is_fulfilled")?,
        fulfilled_on,
        is_deleted: parse_bool(row.get("is_deleted")?, "wishes.is_deleted")?,
    };
    wish.validate()?;
    Ok(wish)
}
