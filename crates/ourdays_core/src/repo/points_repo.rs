//! Love-point account and ledger repository.
//!
//! # Responsibility
//! - Own balance reads and credit grants.
//! - Keep every balance change mirrored by a ledger row in one transaction.
//!
//! # Invariants
//! - Balances never go below zero (debits happen only inside the order
//!   repository's transaction, which enforces the same rule).
//! - Ledger rows are append-only; nothing updates or deletes them.

use crate::model::points::PointEntry;
use crate::model::ValidationError;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use uuid::Uuid;

const LEDGER_SELECT_SQL: &str = "SELECT
    uuid,
    member,
    delta,
    reason,
    order_uuid,
    created_at
FROM point_ledger";

/// Repository interface for love-point accounts.
pub trait PointsRepository {
    /// Creates the account with a zero balance when it does not exist yet.
    fn open_account(&self, member: &str) -> RepoResult<()>;
    fn balance(&self, member: &str) -> RepoResult<i64>;
    /// Credits `amount` (> 0) to the member and returns the ledger entry.
    fn grant(&mut self, member: &str, amount: i64, reason: &str) -> RepoResult<PointEntry>;
    /// Newest-first ledger slice for one member.
    fn ledger(&self, member: &str, limit: u32) -> RepoResult<Vec<PointEntry>>;
}

/// SQLite-backed points repository.
pub struct SqlitePointsRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePointsRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["point_accounts", "point_ledger"])?;
        Ok(Self { conn })
    }
}

impl PointsRepository for SqlitePointsRepository<'_> {
    fn open_account(&self, member: &str) -> RepoResult<()> {
        if member.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "point_account",
                field: "member",
            }
            .into());
        }

        self.conn.execute(
            "INSERT OR IGNORE INTO point_accounts (member, balance) VALUES (?1, 0);",
            [member],
        )?;
        Ok(())
    }

    fn balance(&self, member: &str) -> RepoResult<i64> {
        let balance = self
            .conn
            .query_row(
                "SELECT balance FROM point_accounts WHERE member = ?1;",
                [member],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        balance.ok_or_else(|| RepoError::NotFound {
            entity: "point_account",
            key: member.to_string(),
        })
    }

    fn grant(&mut self, member: &str, amount: i64, reason: &str) -> RepoResult<PointEntry> {
        if amount <= 0 {
            return Err(ValidationError::NonPositiveAmount { value: amount }.into());
        }
        if reason.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "point_entry",
                field: "reason",
            }
            .into());
        }

        let entry_id = Uuid::new_v4();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT OR IGNORE INTO point_accounts (member, balance) VALUES (?1, 0);",
            [member],
        )?;
        tx.execute(
            "UPDATE point_accounts SET balance = balance + ?2 WHERE member = ?1;",
            params![member, amount],
        )?;
        tx.execute(
            "INSERT INTO point_ledger (uuid, member, delta, reason, order_uuid)
             VALUES (?1, ?2, ?3, ?4, NULL);",
            params![entry_id.to_string(), member, amount, reason],
        )?;

        let created_at: i64 = tx.query_row(
            "SELECT created_at FROM point_ledger WHERE uuid = ?1;",
            [entry_id.to_string()],
            |row| row.get(0),
        )?;
        tx.commit()?;

        Ok(PointEntry {
            uuid: entry_id,
            member: member.to_string(),
            delta: amount,
            reason: reason.to_string(),
            order: None,
            created_at,
        })
    }

    fn ledger(&self, member: &str, limit: u32) -> RepoResult<Vec<PointEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LEDGER_SELECT_SQL}
             WHERE member = ?1
             ORDER BY created_at DESC, uuid ASC
             LIMIT ?2;"
        ))?;

        let mut rows = stmt.query(params![member, i64::from(limit)])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_ledger_row(row)?);
        }

        Ok(entries)
    }
}

fn parse_ledger_row(row: &Row<'_>) -> RepoResult<PointEntry> {
    let uuid_text: String = row.get("uuid")?;
    let order = match row.get::<_, Option<String>>("order_uuid")? {
        Some(text) => Some(parse_uuid(&text, "point_ledger.order_uuid")?),
        None => None,
    };

    Ok(PointEntry {
        uuid: parse_uuid(&uuid_text, "point_ledger.uuid")?,
        member: row.get("member")?,
        delta: row.get("delta")?,
        reason: row.get("reason")?,
        order,
        created_at: row.get("created_at")?,
    })
}
