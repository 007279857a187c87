//! # Hash Lock Flows
//!
//! Bonded aggregates need locked funds under their hash. The lock is released
//! to its owner when the aggregate is confirmed, or when it expires unused.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        aggregate, balance, block, chain, embedded, fee_of, hash_lock, network_config, transfer_payload, Keys,
        SignedAggregate, ALL_PLUGINS, CURRENCY, LOCKED_FUNDS,
    };
    use cc_05_plugins::lock::{HashLockInfo, HashLockInfoCacheDescriptor, LockStatus, FAILURE_LOCK_HASH_MISSING_LOCK};
    use cc_06_pipeline::{ChainService, ExecutionConfig, ExecutionError};
    use shared_types::{Amount, EntityType, Hash256, Height};

    const FUNDS: u64 = 1_000_000;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn funded_chain(keys: &Keys) -> ChainService {
        let (mut service, _sink) = chain();
        service
            .seed(|delta| keys.fund(delta, 0, Amount(FUNDS)))
            .unwrap();
        service
    }

    /// Bonded aggregate in which K0 sends 300 currency units to K1.
    fn bonded(keys: &Keys) -> SignedAggregate {
        let payment = embedded(
            keys,
            0,
            EntityType::TRANSFER,
            transfer_payload(keys.address(1).to_unresolved(), CURRENCY, Amount(300)),
        );
        aggregate(keys, 0, EntityType::AGGREGATE_BONDED, vec![payment], &[])
    }

    fn lock(service: &ChainService, hash: &Hash256) -> Option<HashLockInfo> {
        let view = service.create_view();
        let locks = view.as_read_only().sub::<HashLockInfoCacheDescriptor>();
        locks.find(hash).cloned()
    }

    // =========================================================================
    // COMPLETION
    // =========================================================================

    #[test]
    fn test_bonded_aggregate_without_lock_is_rejected() {
        let keys = Keys::new(2);
        let mut service = funded_chain(&keys);

        let result = service.apply_block(&block(2, vec![bonded(&keys).bytes]));
        assert!(matches!(
            result,
            Err(ExecutionError::Rejected { result, .. }) if result == FAILURE_LOCK_HASH_MISSING_LOCK
        ));
    }

    #[test]
    fn test_confirmed_aggregate_releases_lock() {
        let keys = Keys::new(2);
        let mut service = funded_chain(&keys);
        let owner = keys.address(0);

        let aggregate = bonded(&keys);
        let lock_bytes = hash_lock(&keys, 0, 10, aggregate.hash);
        service.apply_block(&block(2, vec![lock_bytes.clone()])).unwrap();

        let locked = lock(&service, &aggregate.hash).unwrap();
        assert_eq!(locked.status, LockStatus::Unused);
        assert_eq!(locked.end_height, Height(12));
        assert_eq!(locked.amount, LOCKED_FUNDS);
        let after_lock = FUNDS - LOCKED_FUNDS.0 - fee_of(&lock_bytes).0;
        assert_eq!(balance(&service, &owner, CURRENCY), Amount(after_lock));

        let finalized = service.apply_block(&block(3, vec![aggregate.bytes.clone()])).unwrap();
        assert_eq!(finalized.transaction_hashes, vec![aggregate.hash]);
        assert!(finalized.receipts_count >= 1);

        assert_eq!(lock(&service, &aggregate.hash).unwrap().status, LockStatus::Used);
        assert_eq!(
            balance(&service, &owner, CURRENCY),
            Amount(after_lock + LOCKED_FUNDS.0 - 300 - fee_of(&aggregate.bytes).0)
        );
        assert_eq!(balance(&service, &keys.address(1), CURRENCY), Amount(300));
    }

    #[test]
    fn test_undo_completion_restores_unused_lock() {
        let keys = Keys::new(2);
        let mut service = funded_chain(&keys);

        let aggregate = bonded(&keys);
        service
            .apply_block(&block(2, vec![hash_lock(&keys, 0, 10, aggregate.hash)]))
            .unwrap();
        let locked_state = service.state_hash().unwrap();

        service.apply_block(&block(3, vec![aggregate.bytes])).unwrap();
        assert_eq!(service.undo_last_block().unwrap(), Height(2));

        assert_eq!(lock(&service, &aggregate.hash).unwrap().status, LockStatus::Unused);
        assert_eq!(service.state_hash().unwrap(), locked_state);
    }

    // =========================================================================
    // EXPIRY
    // =========================================================================

    #[test]
    fn test_unused_lock_expires_back_to_owner() {
        let keys = Keys::new(2);
        let mut service = funded_chain(&keys);
        let owner = keys.address(0);

        let hash = Hash256([0x42; 32]);
        let lock_bytes = hash_lock(&keys, 0, 3, hash);
        service.apply_block(&block(2, vec![lock_bytes.clone()])).unwrap();
        service.apply_block(&block(3, Vec::new())).unwrap();
        service.apply_block(&block(4, Vec::new())).unwrap();
        assert_eq!(lock(&service, &hash).unwrap().status, LockStatus::Unused);

        let finalized = service.apply_block(&block(5, Vec::new())).unwrap();
        assert_eq!(finalized.receipts_count, 1);
        assert_eq!(lock(&service, &hash).unwrap().status, LockStatus::Expired);
        assert_eq!(
            balance(&service, &owner, CURRENCY),
            Amount(FUNDS - fee_of(&lock_bytes).0)
        );

        service.undo_last_block().unwrap();
        assert_eq!(lock(&service, &hash).unwrap().status, LockStatus::Unused);
        assert_eq!(
            balance(&service, &owner, CURRENCY),
            Amount(FUNDS - LOCKED_FUNDS.0 - fee_of(&lock_bytes).0)
        );
    }

    #[test]
    fn test_expired_lock_no_longer_covers_aggregate() {
        let keys = Keys::new(2);
        let mut service = funded_chain(&keys);

        let aggregate = bonded(&keys);
        service
            .apply_block(&block(2, vec![hash_lock(&keys, 0, 1, aggregate.hash)]))
            .unwrap();

        let result = service.apply_block(&block(3, vec![aggregate.bytes]));
        assert!(matches!(result, Err(ExecutionError::Rejected { .. })));
        assert_eq!(service.height(), Height(2));
    }

    // =========================================================================
    // PRUNING
    // =========================================================================

    #[test]
    fn test_undo_of_pruning_block_restores_settled_lock() {
        let keys = Keys::new(2);
        let mut config = network_config();
        config.max_rollback_blocks = 2;
        let execution = ExecutionConfig {
            record_metrics: false,
            ..ExecutionConfig::with_plugins(&ALL_PLUGINS)
        };
        let (mut service, _sink) = ChainService::from_config(config, &execution).unwrap();
        service
            .seed(|delta| keys.fund(delta, 0, Amount(FUNDS)))
            .unwrap();

        let hash = Hash256([0x42; 32]);
        service.apply_block(&block(2, vec![hash_lock(&keys, 0, 1, hash)])).unwrap();
        for height in 3..=5 {
            service.apply_block(&block(height, Vec::new())).unwrap();
        }
        assert_eq!(lock(&service, &hash).unwrap().status, LockStatus::Expired);
        let settled_state = service.state_hash().unwrap();

        // locks ending before height 4 are pruned at height 6
        service.apply_block(&block(6, Vec::new())).unwrap();
        assert!(lock(&service, &hash).is_none());

        assert_eq!(service.undo_last_block().unwrap(), Height(5));
        assert_eq!(lock(&service, &hash).unwrap().status, LockStatus::Expired);
        assert_eq!(service.state_hash().unwrap(), settled_state);
    }
}
