//! Timeline memory repository contract and SQLite implementation.
//!
//! # Invariants
//! - Timeline listing is ordered by `happened_on DESC, uuid ASC`.
//! - Deletion is a soft tombstone; deleted rows stay queryable on request.

use crate::model::memory::{Memory, MemoryId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_date, parse_uuid, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const MEMORY_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    note,
    happened_on,
    photo_path,
    is_deleted
FROM memories";

/// Query options for listing timeline memories.
#[derive(Debug, Clone, Default)]
pub struct MemoryListQuery {
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for timeline memories.
pub trait MemoryRepository {
    fn create_memory(&self, memory: &Memory) -> RepoResult<MemoryId>;
    fn update_memory(&self, memory: &Memory) -> RepoResult<()>;
    fn get_memory(&self, id: MemoryId, include_deleted: bool) -> RepoResult<Option<Memory>>;
    fn list_memories(&self, query: &MemoryListQuery) -> RepoResult<Vec<Memory>>;
    fn soft_delete_memory(&self, id: MemoryId) -> RepoResult<()>;
}

/// SQLite-backed memory repository.
pub struct SqliteMemoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoryRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["memories"])?;
        Ok(Self { conn })
    }
}

impl MemoryRepository for SqliteMemoryRepository<'_> {
    fn create_memory(&self, memory: &Memory) -> RepoResult<MemoryId> {
        memory.validate()?;

        self.conn.execute(
            "INSERT INTO memories (uuid, title, note, happened_on, photo_path, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                memory.uuid.to_string(),
                memory.title.as_str(),
                memory.note.as_deref(),
                memory.happened_on.to_string(),
                memory.photo_path.as_deref(),
                bool_to_int(memory.is_deleted),
            ],
        )?;

        Ok(memory.uuid)
    }

    fn update_memory(&self, memory: &Memory) -> RepoResult<()> {
        memory.validate()?;

        let changed = self.conn.execute(
            "UPDATE memories
             SET
                title = ?1,
                note = ?2,
                happened_on = ?3,
                photo_path = ?4,
                is_deleted = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                memory.title.as_str(),
                memory.note.as_deref(),
                memory.happened_on.to_string(),
                memory.photo_path.as_deref(),
                bool_to_int(memory.is_deleted),
                memory.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "memory",
                key: memory.uuid.to_string(),
            });
        }

        Ok(())
    }

    fn get_memory(&self, id: MemoryId, include_deleted: bool) -> RepoResult<Option<Memory>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMORY_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memory_row(row)?));
        }

        Ok(None)
    }

    fn list_memories(&self, query: &MemoryListQuery) -> RepoResult<Vec<Memory>> {
        let mut sql = format!("{MEMORY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }

        sql.push_str(" ORDER BY happened_on DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut memories = Vec::new();

        while let Some(row) = rows.next()? {
            memories.push(parse_memory_row(row)?);
        }

        Ok(memories)
    }

    fn soft_delete_memory(&self, id: MemoryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE memories
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "memory",
                key: id.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_memory_row(row: &Row<'_>) -> RepoResult<Memory> {
    let uuid_text: String = row.get("uuid")?;
    let happened_on_text: String = row.get("happened_on")?;

    let memory = Memory {
        uuid: parse_uuid(&uuid_text, "memories.uuid")?,
        title: row.get("title")?,
        note: row.get("note")?,
        happened_on: parse_date(&happened_on_text, "memories.happened_on")?,
        photo_path: row.get("photo_path")?,
        is_deleted: parse_bool(row.get("is_deleted")?, "memories.is_deleted")?,
    };
    memory.validate()?;
    Ok(memory)
}
