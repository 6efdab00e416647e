//! In-process change notification hub.
//!
//! Models the hosted backend's row-level change feed for core callers:
//! subscribers get told THAT a resource changed and are expected to re-fetch.
//! No payload diffs travel through the hub and no ordering is guaranteed
//! across rapid consecutive notifications.
//!
//! # Invariants
//! - Tokens unsubscribe explicitly; dropping one changes nothing.
//! - Callbacks run outside the hub lock, so a callback may subscribe or
//!   notify again without deadlocking.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// The tables a view can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resource {
    Memories,
    Wishes,
    Dishes,
    Orders,
    Points,
    Footprints,
}

/// Opaque handle returned by [`ChangeHub::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionToken {
    resource: Resource,
    id: u64,
}

type Callback = Arc<dyn Fn(Resource) + Send + Sync>;

#[derive(Default)]
struct HubState {
    next_id: u64,
    subscribers: BTreeMap<Resource, Vec<(u64, Callback)>>,
}

/// Shared notification hub; cheap to clone behind an `Arc`.
#[derive(Default)]
pub struct ChangeHub {
    state: Mutex<HubState>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one resource and returns its token.
    pub fn subscribe(
        &self,
        resource: Resource,
        on_change: impl Fn(Resource) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let mut state = self.lock_state();
        state.next_id += 1;
        let id = state.next_id;
        state
            .subscribers
            .entry(resource)
            .or_default()
            .push((id, Arc::new(on_change)));
        SubscriptionToken { resource, id }
    }

    /// Removes one subscription. Returns whether it was still registered.
    pub fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        let mut state = self.lock_state();
        let Some(entries) = state.subscribers.get_mut(&token.resource) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(id, _)| *id != token.id);
        entries.len() != before
    }

    /// Tells every subscriber of `resource` that something changed.
    ///
    /// Returns the number of callbacks invoked.
    pub fn notify(&self, resource: Resource) -> usize {
        let callbacks: Vec<Callback> = {
            let state = self.lock_state();
            state
                .subscribers
                .get(&resource)
                .map(|entries| entries.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };

        for callback in &callbacks {
            callback(resource);
        }
        callbacks.len()
    }

    pub fn subscriber_count(&self, resource: Resource) -> usize {
        self.lock_state()
            .subscribers
            .get(&resource)
            .map_or(0, Vec::len)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, HubState> {
        // A poisoned hub lock only means a callback-collection panicked
        // elsewhere; the registry itself is still consistent.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
