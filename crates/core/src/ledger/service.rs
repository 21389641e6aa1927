//! Ledger service: the concurrency-safe balance mutation path.
//!
//! All mutating operations for one entity are serialized behind that
//! entity's lock; operations on distinct entities proceed in parallel.
//! Reads take no lock and observe only committed values (read-committed,
//! no read-your-writes ordering across separate calls).

use std::sync::Arc;

use pointledger_shared::EntityId;
use tracing::{info, warn};

use super::error::LedgerError;
use super::lock::EntityLocks;
use super::store::{BalanceStore, HistoryStore};
use super::types::{BalanceRecord, HistoryEntry, TransactionKind};

/// Ledger service owning the per-entity locking discipline and the
/// charge/use/query/history operations.
pub struct LedgerService {
    balances: Arc<dyn BalanceStore>,
    histories: Arc<dyn HistoryStore>,
    locks: EntityLocks,
    max_balance: i64,
}

impl LedgerService {
    /// Creates a service over the given stores with the given balance
    /// ceiling.
    #[must_use]
    pub fn new(
        balances: Arc<dyn BalanceStore>,
        histories: Arc<dyn HistoryStore>,
        max_balance: i64,
    ) -> Self {
        Self {
            balances,
            histories,
            locks: EntityLocks::new(),
            max_balance,
        }
    }

    /// Returns the current balance record for an entity.
    ///
    /// An entity the store has never seen yields a synthesized
    /// zero-balance record, not an error. Takes no lock: a concurrent
    /// read may land just before or just after an in-flight mutation
    /// commits, but always sees a single committed value.
    pub async fn balance(&self, entity_id: EntityId) -> BalanceRecord {
        self.balances
            .read_balance(entity_id)
            .await
            .unwrap_or_else(|| BalanceRecord::empty(entity_id))
    }

    /// Charges points onto an entity's balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if `amount` is negative.
    /// - [`LedgerError::BalanceCeilingExceeded`] if the new balance would
    ///   exceed the ceiling. State is left unchanged.
    pub async fn charge(
        &self,
        entity_id: EntityId,
        amount: i64,
    ) -> Result<BalanceRecord, LedgerError> {
        info!(%entity_id, amount, "charging points");

        if amount < 0 {
            warn!(%entity_id, amount, "rejected charge with negative amount");
            return Err(LedgerError::InvalidAmount { amount });
        }

        let lock = self.locks.handle(entity_id);
        let _guard = lock.lock().await;

        let current = self.balance(entity_id).await;

        // A sum past i64::MAX is necessarily past the ceiling as well.
        let Some(new_balance) = current
            .balance
            .checked_add(amount)
            .filter(|b| *b <= self.max_balance)
        else {
            warn!(
                %entity_id,
                amount,
                balance = current.balance,
                ceiling = self.max_balance,
                "rejected charge above balance ceiling"
            );
            return Err(LedgerError::BalanceCeilingExceeded {
                balance: current.balance,
                amount,
                ceiling: self.max_balance,
            });
        };

        // Balance first, history second: a crash between the two can only
        // leave history behind the balance, never ahead of it.
        let updated = self.balances.write_balance(entity_id, new_balance).await;
        self.histories
            .append_entry(entity_id, amount, TransactionKind::Charge, updated.updated_at)
            .await;

        info!(%entity_id, amount, balance = updated.balance, "charge accepted");
        Ok(updated)
    }

    /// Uses points from an entity's balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if `amount` is negative.
    /// - [`LedgerError::InsufficientBalance`] if the balance is smaller
    ///   than `amount`. State is left unchanged.
    pub async fn use_points(
        &self,
        entity_id: EntityId,
        amount: i64,
    ) -> Result<BalanceRecord, LedgerError> {
        info!(%entity_id, amount, "using points");

        if amount < 0 {
            warn!(%entity_id, amount, "rejected use with negative amount");
            return Err(LedgerError::InvalidAmount { amount });
        }

        let lock = self.locks.handle(entity_id);
        let _guard = lock.lock().await;

        let current = self.balance(entity_id).await;

        if current.balance < amount {
            warn!(
                %entity_id,
                amount,
                balance = current.balance,
                "rejected use beyond current balance"
            );
            return Err(LedgerError::InsufficientBalance {
                balance: current.balance,
                amount,
            });
        }

        let updated = self
            .balances
            .write_balance(entity_id, current.balance - amount)
            .await;
        self.histories
            .append_entry(entity_id, amount, TransactionKind::Use, updated.updated_at)
            .await;

        info!(%entity_id, amount, balance = updated.balance, "use accepted");
        Ok(updated)
    }

    /// Returns all history entries for an entity in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NoHistory`] when the entity has no entries
    /// at all; "has never transacted" is a reportable condition, not an
    /// empty success.
    pub async fn history(&self, entity_id: EntityId) -> Result<Vec<HistoryEntry>, LedgerError> {
        let entries = self.histories.read_entries(entity_id).await;
        if entries.is_empty() {
            warn!(%entity_id, "no transaction history");
            return Err(LedgerError::NoHistory(entity_id));
        }
        info!(%entity_id, count = entries.len(), "returning transaction history");
        Ok(entries)
    }
}
