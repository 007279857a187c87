//! # Resolver Purity
//!
//! Deferred mosaic levies resolve to the same amount however often they are
//! asked for, never touch the cache, and match what observers apply.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        balance, block, chain, network_config, signed, transfer_payload, Keys, ALL_PLUGINS, CURRENCY,
    };
    use cc_01_cache::{AccountStateCacheDescriptor, CatapultCacheDelta};
    use cc_02_model::{MosaicLevyTransferNotification, ReceiptType, ResolverContext, UnresolvedAmount};
    use cc_05_plugins::load_plugins;
    use cc_05_plugins::mosaic::{MosaicCacheDescriptor, MosaicEntry, MosaicLevy, MosaicLevyType};
    use cc_06_pipeline::TransactionExecutor;
    use shared_types::{Amount, EntityType, Height, MosaicId};

    const LEVIED: MosaicId = MosaicId(0x0A0B_0C0D);

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// LEVIED charges 5% in the currency, paid to K3. K0 holds both mosaics.
    fn seed(keys: &Keys, delta: &mut CatapultCacheDelta) {
        keys.fund(delta, 0, Amount(100_000));
        delta
            .sub_mut::<AccountStateCacheDescriptor>()
            .find_mut(&keys.address(0))
            .unwrap()
            .balances
            .credit(LEVIED, Amount(10_000))
            .unwrap();

        delta
            .sub_mut::<MosaicCacheDescriptor>()
            .insert(MosaicEntry {
                mosaic_id: LEVIED,
                owner: keys.key(3),
                levy: Some(MosaicLevy {
                    levy_type: MosaicLevyType::Percentile,
                    recipient: keys.address(3),
                    mosaic_id: CURRENCY,
                    fee: Amount(500),
                }),
            })
            .unwrap();
    }

    fn levied_transfer(keys: &Keys, amount: u64) -> Vec<u8> {
        signed(
            keys,
            0,
            EntityType::TRANSFER,
            transfer_payload(keys.address(1).to_unresolved(), LEVIED, Amount(amount)),
        )
    }

    // =========================================================================
    // PURITY
    // =========================================================================

    #[test]
    fn test_deferred_levy_resolves_identically() {
        let keys = Keys::new(4);
        let bundle = load_plugins(network_config(), &ALL_PLUGINS).unwrap();
        let mut delta = bundle.cache.create_delta().unwrap();
        seed(&keys, &mut delta);
        bundle.cache.commit(delta, Height(1)).unwrap();

        let executor = TransactionExecutor::new(&bundle, false);
        let bytes = levied_transfer(&keys, 1_000);
        let published = executor.publish(&bytes, &block(2, Vec::new()).context()).unwrap();

        let view = bundle.cache.create_view();
        let before = view.state_hash().unwrap();
        let fees: Vec<UnresolvedAmount> = published
            .notifications
            .iter()
            .filter_map(|notification| notification.downcast::<MosaicLevyTransferNotification>())
            .map(|levy| levy.fee)
            .collect();
        assert_eq!(fees.len(), 1);
        assert!(fees[0].concrete().is_none());

        let first_pass = ResolverContext::new(&bundle.resolvers, &published.mempool);
        let second_pass = ResolverContext::new(&bundle.resolvers, &published.mempool);
        let resolved = first_pass.resolve_amount(view.as_read_only(), &fees[0]).unwrap();

        assert_eq!(resolved, Amount(50));
        assert_eq!(first_pass.resolve_amount(view.as_read_only(), &fees[0]).unwrap(), resolved);
        assert_eq!(second_pass.resolve_amount(view.as_read_only(), &fees[0]).unwrap(), resolved);
        assert_eq!(bundle.cache.create_view().state_hash().unwrap(), before);
    }

    #[test]
    fn test_deferred_levy_needs_its_own_pass() {
        let keys = Keys::new(4);
        let bundle = load_plugins(network_config(), &ALL_PLUGINS).unwrap();
        let executor = TransactionExecutor::new(&bundle, false);
        let context = block(2, Vec::new()).context();

        let first = executor.publish(&levied_transfer(&keys, 1_000), &context).unwrap();
        let second = executor.publish(&levied_transfer(&keys, 1_000), &context).unwrap();
        let fee = first
            .notifications
            .iter()
            .find_map(|notification| notification.downcast::<MosaicLevyTransferNotification>())
            .map(|levy| levy.fee)
            .unwrap();

        let view = bundle.cache.create_view();
        let foreign = ResolverContext::new(&bundle.resolvers, &second.mempool);
        assert!(foreign.resolve_amount(view.as_read_only(), &fee).is_err());
    }

    // =========================================================================
    // EXECUTION
    // =========================================================================

    #[test]
    fn test_levy_is_paid_and_undone() {
        let keys = Keys::new(4);
        let (mut service, _sink) = chain();
        service.seed(|delta| seed(&keys, delta)).unwrap();
        let seeded = service.state_hash().unwrap();

        let finalized = service
            .apply_block(&block(2, vec![levied_transfer(&keys, 1_000)]))
            .unwrap();

        assert!(finalized.receipts_count >= 1);
        assert_eq!(balance(&service, &keys.address(3), CURRENCY), Amount(50));
        assert_eq!(balance(&service, &keys.address(1), LEVIED), Amount(1_000));
        assert_eq!(balance(&service, &keys.address(0), LEVIED), Amount(9_000));

        service.undo_last_block().unwrap();
        assert_eq!(service.state_hash().unwrap(), seeded);
    }

    #[test]
    fn test_levy_receipt_is_recorded() {
        let keys = Keys::new(4);
        let bundle = load_plugins(network_config(), &ALL_PLUGINS).unwrap();
        let mut delta = bundle.cache.create_delta().unwrap();
        seed(&keys, &mut delta);
        bundle.cache.commit(delta, Height(1)).unwrap();

        let executor = cc_06_pipeline::BlockExecutor::new(&bundle, false);
        let mut delta = bundle.cache.create_delta().unwrap();
        let execution = executor
            .execute(&block(2, vec![levied_transfer(&keys, 2_000)]), &mut delta)
            .unwrap();

        let levies: Vec<_> = execution
            .statement
            .iter()
            .flat_map(|(_, receipts)| receipts.iter())
            .filter(|receipt| receipt.receipt_type == ReceiptType::MOSAIC_LEVY)
            .collect();
        assert_eq!(levies.len(), 1);
    }
}
