//! Point balance ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Balance records and transaction history entries
//! - The charge/use mutation path with its invariant checks
//! - Per-entity lock registry serializing mutations
//! - Abstract store traits for balance and history persistence
//! - Error types for ledger operations

pub mod error;
pub mod lock;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use lock::EntityLocks;
pub use service::LedgerService;
pub use store::{BalanceStore, HistoryStore};
pub use types::{BalanceRecord, HistoryEntry, TransactionKind};
