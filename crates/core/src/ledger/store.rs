//! Abstract store traits consumed by the ledger service.
//!
//! The service is agnostic to how balances and histories are held
//! (in-memory map, embedded database, remote store). The ledger service
//! is the sole writer of both stores; durability of the underlying
//! storage is the store's concern, cross-store consistency between
//! balance and history is the service's.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pointledger_shared::EntityId;

use super::types::{BalanceRecord, HistoryEntry, TransactionKind};

/// Holds the current balance per entity.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Reads the balance record for an entity. `None` for an entity the
    /// store has never seen; absent-means-zero is the service's policy,
    /// not the store's.
    async fn read_balance(&self, entity_id: EntityId) -> Option<BalanceRecord>;

    /// Unconditional upsert. Returns the stored record with a fresh
    /// timestamp.
    async fn write_balance(&self, entity_id: EntityId, balance: i64) -> BalanceRecord;
}

/// Append-only log of accepted mutations per entity.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends one entry. The store assigns the monotonically increasing
    /// sequence id.
    async fn append_entry(
        &self,
        entity_id: EntityId,
        amount: i64,
        kind: TransactionKind,
        created_at: DateTime<Utc>,
    );

    /// All entries for an entity in insertion order. An empty vec, not an
    /// error, when nothing is stored; the "no history" error is the
    /// service's policy decision.
    async fn read_entries(&self, entity_id: EntityId) -> Vec<HistoryEntry>;
}
