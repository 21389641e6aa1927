//! In-memory store implementations for Pointledger.
//!
//! This crate provides the concrete balance and history stores behind the
//! core store traits. Both are plain in-process tables; durability is out
//! of scope by design. An optional simulated per-operation latency widens
//! race windows in concurrency tests.

pub mod memory;


pub use memory::{InMemoryBalanceStore, InMemoryHistoryStore};
