//! Property-based tests for LedgerService.
//!
//! - Property 1: Balance Bounds (never negative, never above the ceiling)
//! - Property 2: Conservation (final balance equals the fold of accepted
//!   signed deltas)
//! - Property 3: History/Balance Consistency (replay reconstructs balance)

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pointledger_shared::EntityId;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use super::service::LedgerService;
use super::store::{BalanceStore, HistoryStore};
use super::types::{BalanceRecord, HistoryEntry, TransactionKind};

/// Ceiling small enough that generated sequences actually hit it.
const CEILING: i64 = 10_000;

/// One generated ledger operation.
#[derive(Debug, Clone, Copy)]
enum Op {
    Charge(i64),
    Use(i64),
}

/// Strategy to generate operations, amounts sized so that charges,
/// ceiling rejections and insufficient-balance rejections all occur.
fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..4_000).prop_map(Op::Charge),
        (0i64..4_000).prop_map(Op::Use),
    ]
}

#[derive(Default)]
struct MemBalances {
    rows: Mutex<HashMap<EntityId, BalanceRecord>>,
}

#[async_trait]
impl BalanceStore for MemBalances {
    async fn read_balance(&self, entity_id: EntityId) -> Option<BalanceRecord> {
        self.rows.lock().unwrap().get(&entity_id).copied()
    }

    async fn write_balance(&self, entity_id: EntityId, balance: i64) -> BalanceRecord {
        let record = BalanceRecord {
            entity_id,
            balance,
            updated_at: Utc::now(),
        };
        self.rows.lock().unwrap().insert(entity_id, record);
        record
    }
}

#[derive(Default)]
struct MemHistories {
    entries: Mutex<Vec<HistoryEntry>>,
}

#[async_trait]
impl HistoryStore for MemHistories {
    async fn append_entry(
        &self,
        entity_id: EntityId,
        amount: i64,
        kind: TransactionKind,
        created_at: DateTime<Utc>,
    ) {
        let mut entries = self.entries.lock().unwrap();
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
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .copied()
            .collect()
    }
}

fn make_service() -> LedgerService {
    LedgerService::new(
        Arc::new(MemBalances::default()),
        Arc::new(MemHistories::default()),
        CEILING,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* sequence of charge/use operations, the externally
    /// observable balance stays within `[0, ceiling]` after every step,
    /// and the final balance equals the fold of exactly the accepted
    /// operations' signed deltas.
    #[test]
    fn prop_balance_bounded_and_conserved(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");

        rt.block_on(async {
            let entity = EntityId::new(1);
            let service = make_service();
            let mut expected = 0i64;

            for op in &ops {
                match *op {
                    Op::Charge(amount) => {
                        if let Ok(record) = service.charge(entity, amount).await {
                            expected += amount;
                            prop_assert_eq!(record.balance, expected);
                        } else {
                            // Rejection leaves the balance untouched.
                            prop_assert!(expected + amount > CEILING);
                        }
                    }
                    Op::Use(amount) => {
                        if let Ok(record) = service.use_points(entity, amount).await {
                            expected -= amount;
                            prop_assert_eq!(record.balance, expected);
                        } else {
                            prop_assert!(expected < amount);
                        }
                    }
                }

                let observed = service.balance(entity).await.balance;
                prop_assert!((0..=CEILING).contains(&observed));
                prop_assert_eq!(observed, expected);
            }

            Ok::<(), TestCaseError>(())
        })?;
    }

    /// *For any* sequence of operations, replaying the history entries as
    /// signed deltas from 0 reconstructs the current balance exactly, and
    /// rejected operations never appear in the history.
    #[test]
    fn prop_history_replay_reconstructs_balance(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");

        rt.block_on(async {
            let entity = EntityId::new(1);
            let service = make_service();
            let mut accepted = 0usize;

            for op in &ops {
                let result = match *op {
                    Op::Charge(amount) => service.charge(entity, amount).await,
                    Op::Use(amount) => service.use_points(entity, amount).await,
                };
                if result.is_ok() {
                    accepted += 1;
                }
            }

            let balance = service.balance(entity).await.balance;
            match service.history(entity).await {
                Ok(entries) => {
                    prop_assert_eq!(entries.len(), accepted);
                    let replayed: i64 = entries
                        .iter()
                        .map(|e| e.kind.signed_delta(e.amount))
                        .sum();
                    prop_assert_eq!(replayed, balance);
                }
                Err(_) => {
                    prop_assert_eq!(accepted, 0);
                    prop_assert_eq!(balance, 0);
                }
            }

            Ok::<(), TestCaseError>(())
        })?;
    }
}
