//! Per-entity lock registry.
//!
//! Mutations on the same entity must be strictly serialized while
//! mutations on distinct entities proceed in parallel, so the registry
//! hands out one shared mutex per entity id, created lazily on first
//! access. Entries are never evicted; entity cardinality is bounded in
//! the intended deployment, so the registry growing for process lifetime
//! is a known scaling limit rather than a correctness problem.

use std::sync::Arc;

use dashmap::DashMap;
use pointledger_shared::EntityId;
use tokio::sync::Mutex;

/// Registry of per-entity exclusive locks.
#[derive(Debug, Default)]
pub struct EntityLocks {
    locks: DashMap<EntityId, Arc<Mutex<()>>>,
}

impl EntityLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock handle for an entity, creating it atomically on
    /// first access. All callers referencing the same entity id receive
    /// the same handle.
    #[must_use]
    pub fn handle(&self, entity_id: EntityId) -> Arc<Mutex<()>> {
        self.locks.entry(entity_id).or_default().clone()
    }

    /// Number of entities that have been locked at least once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no entity has ever been locked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
