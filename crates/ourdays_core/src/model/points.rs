//! Love-point ledger records.
//!
//! Balances live in `point_accounts`; every balance change is mirrored by an
//! append-only ledger entry so the history can always explain the number.

use crate::model::order::OrderId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a ledger entry.
pub type PointEntryId = Uuid;

/// One credit or debit on a member's love-point account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEntry {
    pub uuid: PointEntryId,
    pub member: String,
    /// Positive for credits, negative for debits.
    pub delta: i64,
    /// Why the balance changed, e.g. "order" or "chore_reward".
    pub reason: String,
    /// Set when the change was caused by an order.
    pub order: Option<OrderId>,
    /// Epoch milliseconds.
    pub created_at: i64,
}
