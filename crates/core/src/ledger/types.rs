//! Ledger domain types.
//!
//! Balance records are value-like snapshots: every accepted mutation
//! produces a new record, nothing is updated in place from the caller's
//! perspective.

use chrono::{DateTime, Utc};
use pointledger_shared::EntityId;
use serde::{Deserialize, Serialize};

/// An entity's point balance at a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// The entity this balance belongs to.
    pub entity_id: EntityId,
    /// Current point balance. Never negative, never above the ceiling.
    pub balance: i64,
    /// When the balance was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl BalanceRecord {
    /// Synthesized zero-balance record for an entity the store has never
    /// seen. Absence means zero at the read boundary; the store itself
    /// keeps no row.
    #[must_use]
    pub fn empty(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            balance: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Kind of an accepted balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Balance increase.
    Charge,
    /// Balance decrease.
    Use,
}

impl TransactionKind {
    /// The signed delta this kind applies to a balance, given the
    /// mutation's magnitude.
    #[must_use]
    pub const fn signed_delta(self, amount: i64) -> i64 {
        match self {
            Self::Charge => amount,
            Self::Use => -amount,
        }
    }
}

/// An immutable record of one accepted mutation.
///
/// The ordered entries of an entity, replayed as signed deltas starting
/// from 0, reconstruct exactly that entity's current balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Store-assigned sequence id, monotonically increasing.
    pub id: i64,
    /// The entity the mutation applied to.
    pub entity_id: EntityId,
    /// Magnitude of the mutation (non-negative).
    pub amount: i64,
    /// Whether the mutation was a charge or a use.
    pub kind: TransactionKind,
    /// When the mutation was accepted.
    pub created_at: DateTime<Utc>,
}
