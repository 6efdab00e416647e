//! Love-point account use-case service.

use crate::model::points::PointEntry;
use crate::realtime::{ChangeHub, Resource};
use crate::repo::points_repo::PointsRepository;
use crate::repo::RepoResult;
use std::sync::Arc;

/// Use-case facade for balances and the ledger.
pub struct PointsService<R: PointsRepository> {
    repo: R,
    hub: Option<Arc<ChangeHub>>,
}

impl<R: PointsRepository> PointsService<R> {
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

    /// Makes sure the member has an account, starting at zero.
    pub fn ensure_account(&self, member: &str) -> RepoResult<()> {
        self.repo.open_account(member)
    }

    pub fn balance_of(&self, member: &str) -> RepoResult<i64> {
        self.repo.balance(member)
    }

    /// Credits points for a reason, e.g. a finished chore or a surprise.
    pub fn grant(&mut self, member: &str, amount: i64, reason: &str) -> RepoResult<PointEntry> {
        let entry = self.repo.grant(member, amount, reason)?;
        if let Some(hub) = &self.hub {
            hub.notify(Resource::Points);
        }
        Ok(entry)
    }

    /// Newest-first balance history for one member.
    pub fn history(&self, member: &str, limit: u32) -> RepoResult<Vec<PointEntry>> {
        self.repo.ledger(member, limit)
    }
}
