//! Order lifecycle use-case service.
//!
//! # Invariants
//! - Placement is delegated to the repository's single atomic transaction;
//!   this layer never splits payment from insertion.
//! - Point notifications fire only when a balance actually moved.

use crate::model::order::{OrderDraft, OrderId, OrderRecord, OrderStatus};
use crate::realtime::{ChangeHub, Resource};
use crate::repo::order_repo::{OrderListQuery, OrderRepository};
use crate::repo::{RepoError, RepoResult};
use std::sync::Arc;

/// Use-case facade for placing and driving orders.
pub struct OrderService<R: OrderRepository> {
    repo: R,
    hub: Option<Arc<ChangeHub>>,
}

impl<R: OrderRepository> OrderService<R> {
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

    /// Places an order and returns the stored record.
    ///
    /// Fails with [`RepoError::InsufficientPoints`] when the payer cannot
    /// cover the total; nothing is written in that case.
    pub fn place(&mut self, draft: &OrderDraft) -> RepoResult<OrderRecord> {
        let id = self.repo.place_order(draft)?;
        let record = self.repo.get_order(id)?.ok_or_else(|| {
            RepoError::InvalidData("placed order missing on read-back".to_string())
        })?;

        self.announce(Resource::Orders);
        if record.total_points > 0 {
            self.announce(Resource::Points);
        }
        Ok(record)
    }

    /// Chef takes the order.
    pub fn accept(&mut self, id: OrderId) -> RepoResult<OrderRecord> {
        self.transition(id, OrderStatus::Accepted)
    }

    /// Order reached the table; terminal happy path.
    pub fn serve(&mut self, id: OrderId) -> RepoResult<OrderRecord> {
        self.transition(id, OrderStatus::Served)
    }

    /// Abandons the order; paid points come back automatically.
    pub fn cancel(&mut self, id: OrderId) -> RepoResult<OrderRecord> {
        let record = self.transition(id, OrderStatus::Cancelled)?;
        if record.total_points > 0 {
            self.announce(Resource::Points);
        }
        Ok(record)
    }

    pub fn order(&self, id: OrderId) -> RepoResult<Option<OrderRecord>> {
        self.repo.get_order(id)
    }

    pub fn orders(&self, query: &OrderListQuery) -> RepoResult<Vec<OrderRecord>> {
        self.repo.list_orders(query)
    }

    /// Love points "saved" through served orders, the savings-stats number.
    pub fn savings(&self, member: Option<&str>) -> RepoResult<i64> {
        self.repo.served_points_total(member)
    }

    fn transition(&mut self, id: OrderId, to: OrderStatus) -> RepoResult<OrderRecord> {
        let record = self.repo.update_order_status(id, to)?;
        self.announce(Resource::Orders);
        Ok(record)
    }

    fn announce(&self, resource: Resource) {
        if let Some(hub) = &self.hub {
            hub.notify(resource);
        }
    }
}
