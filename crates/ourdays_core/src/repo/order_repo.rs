//! Order repository: placement, lifecycle and the paid-points invariant.
//!
//! # Responsibility
//! - Insert orders with their captured lines.
//! - Debit the payer inside the SAME transaction that inserts the order.
//! - Enforce the status lifecycle, refunding cancelled paid orders.
//!
//! # Invariants
//! - A balance can never go negative: insufficient points fail the whole
//!   placement and leave no order row behind.
//! - Placement and payment are one transaction, never two separate writes.
//! - Every debit/refund leaves a ledger row pointing at the order.

use crate::model::order::{OrderDraft, OrderId, OrderLine, OrderRecord, OrderStatus};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const ORDER_SELECT_SQL: &str = "SELECT
    uuid,
    ordered_by,
    status,
    note,
    total_points,
    created_at,
    updated_at
FROM orders";

/// Query options for listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Optional filter on the ordering member.
    pub member: Option<String>,
    /// Optional filter on lifecycle state.
    pub status: Option<OrderStatus>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for orders.
pub trait OrderRepository {
    /// Places an order, debiting the payer atomically. Fails with
    /// [`RepoError::InsufficientPoints`] when the balance cannot cover it.
    fn place_order(&mut self, draft: &OrderDraft) -> RepoResult<OrderId>;
    fn get_order(&self, id: OrderId) -> RepoResult<Option<OrderRecord>>;
    fn list_orders(&self, query: &OrderListQuery) -> RepoResult<Vec<OrderRecord>>;
    /// Applies a lifecycle step, refunding paid points on cancellation.
    fn update_order_status(&mut self, id: OrderId, to: OrderStatus) -> RepoResult<OrderRecord>;
    /// Sum of `total_points` over served orders, optionally for one member.
    fn served_points_total(&self, member: Option<&str>) -> RepoResult<i64>;
}

/// SQLite-backed order repository.
pub struct SqliteOrderRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteOrderRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &["orders", "order_items", "point_accounts", "point_ledger"],
        )?;
        Ok(Self { conn })
    }
}

impl OrderRepository for SqliteOrderRepository<'_> {
    fn place_order(&mut self, draft: &OrderDraft) -> RepoResult<OrderId> {
        draft.validate()?;
        let total = draft.total_points();
        let order_id = Uuid::new_v4();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT OR IGNORE INTO point_accounts (member, balance) VALUES (?1, 0);",
            [draft.ordered_by.as_str()],
        )?;
        let balance: i64 = tx.query_row(
            "SELECT balance FROM point_accounts WHERE member = ?1;",
            [draft.ordered_by.as_str()],
            |row| row.get(0),
        )?;
        if balance < total {
            return Err(RepoError::InsufficientPoints {
                member: draft.ordered_by.clone(),
                balance,
                required: total,
            });
        }

        tx.execute(
            "INSERT INTO orders (uuid, ordered_by, status, note, total_points)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                order_id.to_string(),
                draft.ordered_by.as_str(),
                status_to_db(OrderStatus::Pending),
                draft.note.as_deref(),
                total,
            ],
        )?;

        for (line_no, line) in draft.lines.iter().enumerate() {
            tx.execute(
                "INSERT INTO order_items
                    (order_uuid, line_no, dish_uuid, name, price_points, quantity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    order_id.to_string(),
                    line_no as i64,
                    line.dish.map(|id| id.to_string()),
                    line.name.as_str(),
                    line.price_points,
                    line.quantity,
                ],
            )?;
        }

        if total > 0 {
            debit_points(&tx, &draft.ordered_by, total, order_id)?;
        }

        tx.commit()?;
        Ok(order_id)
    }

    fn get_order(&self, id: OrderId) -> RepoResult<Option<OrderRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ORDER_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let record = parse_order_row(self.conn, row)?;
            return Ok(Some(record));
        }

        Ok(None)
    }

    fn list_orders(&self, query: &OrderListQuery) -> RepoResult<Vec<OrderRecord>> {
        let mut sql = format!("{ORDER_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(member) = query.member.as_ref() {
            sql.push_str(" AND ordered_by = ?");
            bind_values.push(Value::Text(member.clone()));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

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
        let mut orders = Vec::new();

        while let Some(row) = rows.next()? {
            orders.push(parse_order_row(self.conn, row)?);
        }

        Ok(orders)
    }

    fn update_order_status(&mut self, id: OrderId, to: OrderStatus) -> RepoResult<OrderRecord> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = tx
            .query_row(
                "SELECT status, ordered_by, total_points FROM orders WHERE uuid = ?1;",
                [id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        let (status_text, ordered_by, total) = current.ok_or_else(|| RepoError::NotFound {
            entity: "order",
            key: id.to_string(),
        })?;
        let from = parse_status(&status_text)?;

        if !from.can_transition(to) {
            return Err(RepoError::InvalidStatusChange { from, to });
        }

        tx.execute(
            "UPDATE orders
             SET
                status = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), status_to_db(to)],
        )?;

        if to == OrderStatus::Cancelled && total > 0 {
            refund_points(&tx, &ordered_by, total, id)?;
        }

        tx.commit()?;

        self.get_order(id)?.ok_or_else(|| {
            RepoError::InvalidData("updated order missing on read-back".to_string())
        })
    }

    fn served_points_total(&self, member: Option<&str>) -> RepoResult<i64> {
        let total = match member {
            Some(member) => self.conn.query_row(
                "SELECT COALESCE(SUM(total_points), 0)
                 FROM orders
                 WHERE status = 'served' AND ordered_by = ?1;",
                [member],
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                "SELECT COALESCE(SUM(total_points), 0) FROM orders WHERE status = 'served';",
                [],
                |row| row.get(0),
            )?,
        };
        Ok(total)
    }
}

fn debit_points(
    tx: &Transaction<'_>,
    member: &str,
    amount: i64,
    order_id: OrderId,
) -> RepoResult<()> {
    tx.execute(
        "UPDATE point_accounts SET balance = balance - ?2 WHERE member = ?1;",
        params![member, amount],
    )?;
    tx.execute(
        "INSERT INTO point_ledger (uuid, member, delta, reason, order_uuid)
         VALUES (?1, ?2, ?3, 'order', ?4);",
        params![
            Uuid::new_v4().to_string(),
            member,
            -amount,
            order_id.to_string(),
        ],
    )?;
    Ok(())
}

fn refund_points(
    tx: &Transaction<'_>,
    member: &str,
    amount: i64,
    order_id: OrderId,
) -> RepoResult<()> {
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
         VALUES (?1, ?2, ?3, 'order_cancelled', ?4);",
        params![
            Uuid::new_v4().to_string(),
            member,
            amount,
            order_id.to_string(),
        ],
    )?;
    Ok(())
}

fn parse_order_row(conn: &Connection, row: &Row<'_>) -> RepoResult<OrderRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "orders.uuid")?;
    let status_text: String = row.get("status")?;

    Ok(OrderRecord {
        uuid,
        ordered_by: row.get("ordered_by")?,
        status: parse_status(&status_text)?,
        note: row.get("note")?,
        total_points: row.get("total_points")?,
        lines: load_order_lines(conn, &uuid_text)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_order_lines(conn: &Connection, order_uuid: &str) -> RepoResult<Vec<OrderLine>> {
    let mut stmt = conn.prepare(
        "SELECT dish_uuid, name, price_points, quantity
         FROM order_items
         WHERE order_uuid = ?1
         ORDER BY line_no ASC;",
    )?;

    let mut rows = stmt.query([order_uuid])?;
    let mut lines = Vec::new();

    while let Some(row) = rows.next()? {
        let dish = match row.get::<_, Option<String>>("dish_uuid")? {
            Some(text) => Some(parse_uuid(&text, "order_items.dish_uuid")?),
            None => None,
        };
        lines.push(OrderLine {
            dish,
            name: row.get("name")?,
            price_points: row.get("price_points")?,
            quantity: row.get("quantity")?,
        });
    }

    Ok(lines)
}

fn status_to_db(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Accepted => "accepted",
        OrderStatus::Served => "served",
        OrderStatus::Cancelled => "cancelled",
    }
}

fn parse_status(value: &str) -> RepoResult<OrderStatus> {
    match value {
        "pending" => Ok(OrderStatus::Pending),
        "accepted" => Ok(OrderStatus::Accepted),
        "served" => Ok(OrderStatus::Served),
        "cancelled" => Ok(OrderStatus::Cancelled),
        other => Err(RepoError::InvalidData(format!(
            "invalid order status `{other}` in orders.status"
        ))),
    }
}
