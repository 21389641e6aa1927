//! Ledger error types.
//!
//! Every rejection is raised synchronously at its precondition check,
//! before any store mutation. The four kinds stay individually
//! distinguishable all the way to the caller.

use pointledger_shared::EntityId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// A requested mutation amount is negative.
    #[error("Amount must be zero or positive, got {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: i64,
    },

    /// A charge would push the balance above the ceiling.
    #[error("Charging {amount} onto balance {balance} would exceed the ceiling of {ceiling}")]
    BalanceCeilingExceeded {
        /// Balance at the time of the rejected charge.
        balance: i64,
        /// The rejected charge amount.
        amount: i64,
        /// The configured maximum balance.
        ceiling: i64,
    },

    /// A use amount exceeds the current balance.
    #[error("Cannot use {amount} points, current balance is {balance}")]
    InsufficientBalance {
        /// Balance at the time of the rejected use.
        balance: i64,
        /// The rejected use amount.
        amount: i64,
    },

    /// A history query found zero entries for the entity.
    #[error("Entity {0} has no transaction history")]
    NoHistory(EntityId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::BalanceCeilingExceeded { .. } => "BALANCE_CEILING_EXCEEDED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::NoHistory(_) => "NO_HISTORY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::InvalidAmount { .. } => 400,

            // 404 Not Found - entity has never transacted
            Self::NoHistory(_) => 404,

            // 422 Unprocessable Entity - business rule rejections
            Self::BalanceCeilingExceeded { .. } | Self::InsufficientBalance { .. } => 422,
        }
    }
}
