//! Footprint repository contract and SQLite implementation.
//!
//! # Invariants
//! - Stored coordinates are WGS-84; the API only speaks `Wgs84Point`.
//! - Map listing is ordered by `visited_on DESC, uuid ASC`.

use crate::geo::Wgs84Point;
use crate::model::footprint::{Footprint, FootprintId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_date, parse_uuid, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const FOOTPRINT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    note,
    visited_on,
    lng,
    lat,
    is_deleted
FROM footprints";

/// Query options for listing footprints.
#[derive(Debug, Clone, Default)]
pub struct FootprintListQuery {
    pub include_deleted: bool,
}

/// Repository interface for map footprints.
pub trait FootprintRepository {
    fn create_footprint(&self, footprint: &Footprint) -> RepoResult<FootprintId>;
    fn update_footprint(&self, footprint: &Footprint) -> RepoResult<()>;
    fn get_footprint(
        &self,
        id: FootprintId,
        include_deleted: bool,
    ) -> RepoResult<Option<Footprint>>;
    fn list_footprints(&self, query: &FootprintListQuery) -> RepoResult<Vec<Footprint>>;
    fn soft_delete_footprint(&self, id: FootprintId) -> RepoResult<()>;
}

/// SQLite-backed footprint repository.
pub struct SqliteFootprintRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFootprintRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["footprints"])?;
        Ok(Self { conn })
    }
}

impl FootprintRepository for SqliteFootprintRepository<'_> {
    fn create_footprint(&self, footprint: &Footprint) -> RepoResult<FootprintId> {
        footprint.validate()?;

        self.conn.execute(
            "INSERT INTO footprints (uuid, title, note, visited_on, lng, lat, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                footprint.uuid.to_string(),
                footprint.title.as_str(),
                footprint.note.as_deref(),
                footprint.visited_on.to_string(),
                footprint.location.lng,
                footprint.location.lat,
                bool_to_int(footprint.is_deleted),
            ],
        )?;

        Ok(footprint.uuid)
    }

    fn update_footprint(&self, footprint: &Footprint) -> RepoResult<()> {
        footprint.validate()?;

        let changed = self.conn.execute(
            "UPDATE footprints
             SET
                title = ?1,
                note = ?2,
                visited_on = ?3,
                lng = ?4,
                lat = ?5,
                is_deleted = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                footprint.title.as_str(),
                footprint.note.as_deref(),
                footprint.visited_on.to_string(),
                footprint.location.lng,
                footprint.location.lat,
                bool_to_int(footprint.is_deleted),
                footprint.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "footprint",
                key: footprint.uuid.to_string(),
            });
        }

        Ok(())
    }

    fn get_footprint(
        &self,
        id: FootprintId,
        include_deleted: bool,
    ) -> RepoResult<Option<Footprint>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FOOTPRINT_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_footprint_row(row)?));
        }

        Ok(None)
    }

    fn list_footprints(&self, query: &FootprintListQuery) -> RepoResult<Vec<Footprint>> {
        let mut sql = format!("{FOOTPRINT_SELECT_SQL} WHERE 1 = 1");

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }

        sql.push_str(" ORDER BY visited_on DESC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut footprints = Vec::new();

        while let Some(row) = rows.next()? {
            footprints.push(parse_footprint_row(row)?);
        }

        Ok(footprints)
    }

    fn soft_delete_footprint(&self, id: FootprintId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE footprints
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "footprint",
                key: id.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_footprint_row(row: &Row<'_>) -> RepoResult<Footprint> {
    let uuid_text: String = row.get("uuid")?;
    let visited_on_text: String = row.get("visited_on")?;

    let footprint = Footprint {
        uuid: parse_uuid(&uuid_text, "footprints.uuid")?,
        title: row.get("title")?,
        note: row.get("note")?,
        visited_on: parse_date(&visited_on_text, "footprints.visited_on")?,
        location: Wgs84Point::new(row.get("lng")?, row.get("lat")?),
        is_deleted: parse_bool(row.get("is_deleted")?, "footprints.is_deleted")?,
    };
    footprint.validate()?;
    Ok(footprint)
}
