//! Use-case service facades.
//!
//! # Responsibility
//! - Provide stable entry points for view-level callers.
//! - Delegate persistence to repository implementations.
//! - Publish realtime notifications after successful mutations.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Services remain storage-agnostic; only repo traits appear in bounds.

pub mod footprint_service;
pub mod menu_service;
pub mod order_service;
pub mod points_service;
pub mod timeline_service;
pub mod wish_service;
