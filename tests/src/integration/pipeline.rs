//! # Block Pipeline Integration
//!
//! The full producer path across axle-txpool and axle-state:
//!
//! 1. **Admission**: signed transactions pass the check pipeline into the
//!    fee-ordered pool
//! 2. **Packing**: the producer drains the highest-fee transactions for a
//!    block, optionally filtered per module
//! 3. **Execution**: each packed transaction's effects land in the state
//!    store between `next_txn` boundaries
//! 4. **Sealing**: `commit` yields the state root, `finalize_block` binds
//!    it to the block hash, `packed` evicts the included transactions

#[cfg(test)]
mod tests {
    use crate::init_tracing;
    use crate::integration::{staking_txn, transfer_txn};

    use axle_state::{StateError, StateKv};
    use axle_txpool::{min_fee_check, PoolConfig, PoolError, TxPool, TxnCheck};
    use axle_types::Namespace;
    use std::sync::Arc;

    fn mem_state() -> StateKv {
        use axle_kv::MemoryKv;
        StateKv::with_stores(Box::new(MemoryKv::new()), Box::new(MemoryKv::new()))
            .expect("memory state opens")
    }

    /// Check that rejects every transaction outside the asset module.
    fn asset_only_check() -> TxnCheck {
        Arc::new(|txn: &axle_types::SignedTxn| {
            if txn.raw.call.module == "asset" {
                Ok(())
            } else {
                Err(PoolError::check_failed("module not enabled"))
            }
        })
    }

    #[test]
    fn block_pipeline_runs_pool_to_finalized_state() {
        init_tracing();
        let pool = TxPool::new(PoolConfig::default());
        let state = mem_state();
        let asset = Namespace::new("asset");

        // Genesis balances.
        state.set(&asset, b"alice", &100u64.to_le_bytes());
        state.set(&asset, b"bob", &0u64.to_le_bytes());
        state.next_txn();
        state.commit().unwrap();
        let genesis = [0u8; 32];
        state.finalize_block(&genesis).unwrap();

        // Admission.
        for (fee, nonce) in [(10, 0), (30, 1), (20, 2)] {
            pool.insert(transfer_txn(0xAA, fee, nonce)).unwrap();
        }
        assert_eq!(pool.pool_size(), 3);

        // Packing: fee-descending.
        let block_hash = [1u8; 32];
        let packed = pool.pack(block_hash, 2).unwrap();
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0].fee_price(), 30);
        assert_eq!(packed[1].fee_price(), 20);

        // Execution: 10 units move per packed transaction.
        let mut alice = 100u64;
        let mut bob = 0u64;
        for _ in &packed {
            alice -= 10;
            bob += 10;
            state.set(&asset, b"alice", &alice.to_le_bytes());
            state.set(&asset, b"bob", &bob.to_le_bytes());
            state.next_txn();
        }

        // Sealing.
        let root = state.commit().unwrap();
        state.finalize_block(&block_hash).unwrap();
        assert_eq!(state.state_root_of(&block_hash).unwrap(), root);

        let hashes: Vec<_> = packed.iter().map(|t| t.hash).collect();
        pool.packed(block_hash, &hashes).unwrap();
        assert_eq!(pool.pool_size(), 1);
        assert_eq!(pool.pack(block_hash, 10).unwrap()[0].fee_price(), 10);

        // Current and historical reads agree with execution.
        assert_eq!(state.get(&asset, b"alice").unwrap(), 80u64.to_le_bytes());
        assert_eq!(
            state
                .get_by_block_hash(&asset, b"alice", &genesis)
                .unwrap(),
            100u64.to_le_bytes()
        );
    }

    #[test]
    fn pack_order_breaks_fee_ties_by_arrival() {
        let pool = TxPool::with_defaults();
        let first_at_five = transfer_txn(0x01, 5, 0);
        let second_at_five = transfer_txn(0x02, 5, 1);
        pool.insert(first_at_five.clone()).unwrap();
        pool.insert(transfer_txn(0x03, 20, 2)).unwrap();
        pool.insert(second_at_five.clone()).unwrap();

        let packed = pool.pack([0u8; 32], 10).unwrap();
        let fees: Vec<_> = packed.iter().map(|t| t.fee_price()).collect();
        assert_eq!(fees, vec![20, 5, 5]);
        assert_eq!(packed[1].hash, first_at_five.hash);
        assert_eq!(packed[2].hash, second_at_five.hash);
    }

    #[test]
    fn pack_for_bounds_the_scan_not_the_matches() {
        let pool = TxPool::with_defaults();
        pool.insert(staking_txn(0x01, 100, 0)).unwrap();
        pool.insert(staking_txn(0x02, 90, 1)).unwrap();
        pool.insert(transfer_txn(0x03, 10, 2)).unwrap();

        let is_asset = |txn: &axle_types::SignedTxn| txn.raw.call.module == "asset";

        // The top two entries by fee are staking; a scan bounded at two
        // never reaches the asset transaction.
        let narrow = pool.pack_for([0u8; 32], 2, is_asset).unwrap();
        assert!(narrow.is_empty());

        let wide = pool.pack_for([0u8; 32], 3, is_asset).unwrap();
        assert_eq!(wide.len(), 1);
        assert_eq!(wide[0].fee_price(), 10);
    }

    #[test]
    fn batch_insert_reports_per_transaction_outcomes() {
        let pool = TxPool::new(PoolConfig::default())
            .with_base_checks(vec![min_fee_check(5)]);
        let good = transfer_txn(0x01, 10, 0);
        let cheap = transfer_txn(0x02, 1, 1);
        let results = pool.batch_insert(vec![good.clone(), cheap, good]);

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PoolError::CheckFailed { .. })));
        assert!(matches!(results[2], Err(PoolError::Duplicate(_))));
        assert_eq!(pool.pool_size(), 1);
    }

    #[test]
    fn sync_insert_skips_configured_check_lists() {
        let pool = TxPool::new(PoolConfig::default())
            .with_module_checks(vec![asset_only_check()]);
        let staking = staking_txn(0x01, 10, 0);

        assert!(matches!(
            pool.insert(staking.clone()),
            Err(PoolError::CheckFailed { .. })
        ));
        // Re-admission of locally known transactions runs structural
        // checks only.
        assert!(pool.sync_insert(vec![staking]).into_iter().all(|r| r.is_ok()));
        assert_eq!(pool.pool_size(), 1);
    }

    #[test]
    fn reset_empties_the_pool() {
        let pool = TxPool::with_defaults();
        for nonce in 0..5 {
            pool.insert(transfer_txn(0x01, nonce + 1, nonce)).unwrap();
        }
        pool.reset().unwrap();
        assert_eq!(pool.pool_size(), 0);
        assert!(pool.pack([0u8; 32], 10).unwrap().is_empty());
    }

    #[test]
    fn failed_transaction_effects_never_reach_the_block() {
        let state = mem_state();
        let asset = Namespace::new("asset");

        state.set(&asset, b"alice", b"100");
        state.next_txn();

        // A transaction that writes, then fails before its boundary.
        state.set(&asset, b"alice", b"0");
        state.set(&asset, b"attacker", b"100");
        state.discard_txn();

        state.commit().unwrap();
        state.finalize_block(&[1u8; 32]).unwrap();
        assert_eq!(state.get(&asset, b"alice").unwrap(), b"100");
        assert!(matches!(
            state.get(&asset, b"attacker"),
            Err(StateError::NotFound)
        ));
    }

    #[test]
    fn roots_diverge_when_blocks_diverge() {
        let state = mem_state();
        let asset = Namespace::new("asset");

        state.set(&asset, b"alice", b"100");
        state.next_txn();
        let root1 = state.commit().unwrap();
        state.finalize_block(&[1u8; 32]).unwrap();

        state.set(&asset, b"alice", b"60");
        state.next_txn();
        let root2 = state.commit().unwrap();
        state.finalize_block(&[2u8; 32]).unwrap();

        assert_ne!(root1, root2);
        assert_eq!(state.state_root_of(&[1u8; 32]).unwrap(), root1);
        assert_eq!(state.state_root_of(&[2u8; 32]).unwrap(), root2);
    }

    #[test]
    fn concurrent_producers_admit_each_transaction_once() {
        let pool = Arc::new(TxPool::with_defaults());
        let txn = transfer_txn(0x01, 10, 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let txn = txn.clone();
                std::thread::spawn(move || pool.insert(txn).is_ok())
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().expect("insert thread"))
            .filter(|&admitted| admitted)
            .count();

        assert_eq!(admitted, 1);
        assert_eq!(pool.pool_size(), 1);
    }
}
