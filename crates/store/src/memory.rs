//! Map- and log-backed in-memory stores.
//!
//! These stand in for whatever key-value tables a deployment would use.
//! They guarantee only their own internal consistency (a read never sees
//! a torn value); cross-store consistency between balance and history is
//! the ledger service's job.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::RwLock;

use pointledger_core::ledger::{
    BalanceRecord, BalanceStore, HistoryEntry, HistoryStore, TransactionKind,
};
use pointledger_shared::EntityId;

/// Sleeps a random duration up to `max` to mimic storage access latency.
async fn throttle(max: Option<Duration>) {
    if let Some(max) = max {
        let micros = rand::rng().random_range(0..=u64::try_from(max.as_micros()).unwrap_or(0));
        tokio::time::sleep(Duration::from_micros(micros)).await;
    }
}

/// In-memory balance table, keyed by entity id.
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    rows: RwLock<HashMap<EntityId, BalanceRecord>>,
    latency: Option<Duration>,
}

impl InMemoryBalanceStore {
    /// Creates an empty store with no simulated latency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that sleeps a random duration up to `max`
    /// on every operation, for tests that need wide race windows.
    #[must_use]
    pub fn with_simulated_latency(max: Duration) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            latency: Some(max),
        }
    }
}

#[async_trait]
impl BalanceStore for InMemoryBalanceStore {
    async fn read_balance(&self, entity_id: EntityId) -> Option<BalanceRecord> {
        throttle(self.latency).await;
        self.rows.read().await.get(&entity_id).copied()
    }

    async fn write_balance(&self, entity_id: EntityId, balance: i64) -> BalanceRecord {
        throttle(self.latency).await;
        let record = BalanceRecord {
            entity_id,
            balance,
            updated_at: Utc::now(),
        };
        self.rows.write().await.insert(entity_id, record);
        record
    }
}

/// In-memory append-only history log.
///
/// A single insertion-ordered log; sequence ids are assigned under the
/// write lock, so they are strictly increasing in append order.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
    latency: Option<Duration>,
}

impl InMemoryHistoryStore {
    /// Creates an empty store with no simulated latency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that sleeps a random duration up to `max`
    /// on every operation.
    #[must_use]
    pub fn with_simulated_latency(max: Duration) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            latency: Some(max),
        }
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append_entry(
        &self,
        entity_id: EntityId,
        amount: i64,
        kind: TransactionKind,
        created_at: DateTime<Utc>,
    ) {
        throttle(self.latency).await;
        let mut entries = self.entries.write().await;
        let id = entries.len() as i64 + 1;
        entries.push(HistoryEntry {
            id,
            entity_id,
            amount,
            kind,
            created_at,
        });
    }

    async fn read_entries(&self, entity_id: EntityId) -> Vec<HistoryEntry> {
        throttle(self.latency).await;
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_absent_entity_is_none() {
        let store = InMemoryBalanceStore::new();
        assert!(store.read_balance(EntityId::new(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trips() {
        let store = InMemoryBalanceStore::new();
        let written = store.write_balance(EntityId::new(1), 1500).await;

        let read = store.read_balance(EntityId::new(1)).await.unwrap();
        assert_eq!(read, written);
        assert_eq!(read.balance, 1500);
    }

    #[tokio::test]
    async fn test_write_is_an_upsert() {
        let store = InMemoryBalanceStore::new();
        store.write_balance(EntityId::new(1), 100).await;
        store.write_balance(EntityId::new(1), 200).await;

        assert_eq!(
            store.read_balance(EntityId::new(1)).await.unwrap().balance,
            200
        );
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_sequence_ids() {
        let store = InMemoryHistoryStore::new();
        let now = Utc::now();
        store
            .append_entry(EntityId::new(1), 100, TransactionKind::Charge, now)
            .await;
        store
            .append_entry(EntityId::new(2), 200, TransactionKind::Charge, now)
            .await;
        store
            .append_entry(EntityId::new(1), 50, TransactionKind::Use, now)
            .await;

        let ids: Vec<i64> = store
            .read_entries(EntityId::new(1))
            .await
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_read_entries_filters_by_entity_in_order() {
        let store = InMemoryHistoryStore::new();
        let now = Utc::now();
        store
            .append_entry(EntityId::new(1), 100, TransactionKind::Charge, now)
            .await;
        store
            .append_entry(EntityId::new(2), 999, TransactionKind::Charge, now)
            .await;
        store
            .append_entry(EntityId::new(1), 50, TransactionKind::Use, now)
            .await;

        let entries = store.read_entries(EntityId::new(1)).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].amount, 100);
        assert_eq!(entries[1].amount, 50);
    }

    #[tokio::test]
    async fn test_read_entries_of_unknown_entity_is_empty_not_an_error() {
        let store = InMemoryHistoryStore::new();
        assert!(store.read_entries(EntityId::new(404)).await.is_empty());
    }
}
