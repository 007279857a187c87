//! # Aggregate Flows
//!
//! Cosigner eligibility for aggregates that modify multisig accounts, checked
//! through the assembled validator and through block execution.
//!
//! Keys added inside the aggregate may cosign it; keys being removed from an
//! account that is not yet multisig may not.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        aggregate, balance, block, chain, embedded, multisig_payload, network_config, transfer_payload, Keys,
        ALL_PLUGINS, CURRENCY,
    };
    use cc_02_model::{
        AggregateCosignaturesNotification, Cosignature, CosignatoryModificationType, EmbeddedTransaction, Notification,
        ResolverContext,
    };
    use cc_03_validators::ValidatorContext;
    use cc_05_plugins::aggregate::FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS;
    use cc_05_plugins::multisig::MultisigCacheDescriptor;
    use cc_05_plugins::{load_plugins, PluginBundle};
    use cc_06_pipeline::{ChainService, ExecutionError};
    use shared_types::{
        Amount, EntityType, Height, Key, Signature, Timestamp, ValidationResult, FAILURE_CORE_INSUFFICIENT_BALANCE,
        FAILURE_SIGNATURE_NOT_VERIFIABLE,
    };
    use std::collections::BTreeSet;
    use std::sync::Arc;

    const ADD: CosignatoryModificationType = CosignatoryModificationType::Add;
    const DEL: CosignatoryModificationType = CosignatoryModificationType::Del;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// K1 adds K2 and K4 and removes K3 and K5 in one embedded transaction.
    fn look_ahead_transaction(keys: &Keys) -> EmbeddedTransaction {
        embedded(
            keys,
            1,
            EntityType::MODIFY_MULTISIG_ACCOUNT,
            multisig_payload(
                1,
                1,
                &[
                    (ADD, keys.key(2)),
                    (DEL, keys.key(3)),
                    (ADD, keys.key(4)),
                    (DEL, keys.key(5)),
                ],
            ),
        )
    }

    fn validate_cosigners(bundle: &PluginBundle, keys: &Keys, cosigners: &[usize]) -> ValidationResult {
        let notification: Notification = AggregateCosignaturesNotification {
            signer: keys.key(0),
            transactions: Arc::from(vec![look_ahead_transaction(keys)]),
            cosignatures: cosigners
                .iter()
                .map(|index| Cosignature {
                    signer: keys.key(*index),
                    signature: Signature::zero(),
                })
                .collect::<Vec<_>>()
                .into(),
        }
        .into();

        let view = bundle.cache.create_view();
        let resolver_context = ResolverContext::without_mempool(&bundle.resolvers);
        let context = ValidatorContext::new(
            Height(2),
            Timestamp(0),
            &bundle.config,
            view.as_read_only(),
            &resolver_context,
        );
        bundle.validator.validate_all(&[notification], &context)
    }

    fn funded_chain(keys: &Keys) -> ChainService {
        let (mut service, _sink) = chain();
        service
            .seed(|delta| keys.fund(delta, 1, Amount(100_000)))
            .unwrap();
        service
    }

    fn conversion(keys: &Keys, cosigners: &[usize]) -> Vec<u8> {
        let transaction = embedded(
            keys,
            1,
            EntityType::MODIFY_MULTISIG_ACCOUNT,
            multisig_payload(1, 1, &[(ADD, keys.key(2)), (ADD, keys.key(4))]),
        );
        aggregate(keys, 1, EntityType::AGGREGATE_COMPLETE, vec![transaction], cosigners).bytes
    }

    fn cosignatories(service: &ChainService, key: &Key) -> Option<BTreeSet<Key>> {
        let view = service.create_view();
        let multisig = view.as_read_only().sub::<MultisigCacheDescriptor>();
        multisig.find(key).map(|entry| entry.cosignatories.clone())
    }

    // =========================================================================
    // LOOK-AHEAD ELIGIBILITY
    // =========================================================================

    #[test]
    fn test_embedded_signer_and_added_keys_are_eligible() {
        let keys = Keys::new(6);
        let bundle = load_plugins(network_config(), &ALL_PLUGINS).unwrap();

        for cosigner in [1, 2, 4] {
            assert_eq!(
                validate_cosigners(&bundle, &keys, &[cosigner]),
                ValidationResult::SUCCESS,
                "cosigner K{}",
                cosigner
            );
        }
        assert_eq!(validate_cosigners(&bundle, &keys, &[1, 2, 4]), ValidationResult::SUCCESS);
    }

    #[test]
    fn test_removed_keys_are_not_eligible() {
        let keys = Keys::new(6);
        let bundle = load_plugins(network_config(), &ALL_PLUGINS).unwrap();

        for cosigner in [3, 5] {
            assert_eq!(
                validate_cosigners(&bundle, &keys, &[cosigner]),
                FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS,
                "cosigner K{}",
                cosigner
            );
        }
        assert_eq!(
            validate_cosigners(&bundle, &keys, &[2, 3]),
            FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS
        );
    }

    // =========================================================================
    // EXECUTION
    // =========================================================================

    #[test]
    fn test_conversion_cosigned_by_new_cosignatories() {
        let keys = Keys::new(6);
        let mut service = funded_chain(&keys);

        service.apply_block(&block(2, vec![conversion(&keys, &[2, 4])])).unwrap();

        assert_eq!(
            cosignatories(&service, &keys.key(1)),
            Some(BTreeSet::from([keys.key(2), keys.key(4)]))
        );
        let view = service.create_view();
        let multisig = view.as_read_only().sub::<MultisigCacheDescriptor>();
        assert!(multisig.find(&keys.key(2)).unwrap().multisig_accounts.contains(&keys.key(1)));
    }

    #[test]
    fn test_conversion_is_undone_with_its_block() {
        let keys = Keys::new(6);
        let mut service = funded_chain(&keys);
        let seeded = service.state_hash().unwrap();

        service.apply_block(&block(2, vec![conversion(&keys, &[2, 4])])).unwrap();
        service.undo_last_block().unwrap();

        assert_eq!(cosignatories(&service, &keys.key(1)), None);
        assert_eq!(cosignatories(&service, &keys.key(2)), None);
        assert_eq!(service.state_hash().unwrap(), seeded);
    }

    #[test]
    fn test_outsider_cosignature_rejects_block() {
        let keys = Keys::new(6);
        let mut service = funded_chain(&keys);

        let result = service.apply_block(&block(2, vec![conversion(&keys, &[2, 5])]));
        assert!(matches!(
            result,
            Err(ExecutionError::Rejected { result, .. }) if result == FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS
        ));
        assert_eq!(cosignatories(&service, &keys.key(1)), None);
    }

    #[test]
    fn test_forged_cosignature_is_not_verifiable() {
        let keys = Keys::new(6);
        let mut service = funded_chain(&keys);

        let mut bytes = conversion(&keys, &[2]);
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let result = service.apply_block(&block(2, vec![bytes]));
        assert!(matches!(
            result,
            Err(ExecutionError::Rejected { result, .. }) if result == FAILURE_SIGNATURE_NOT_VERIFIABLE
        ));
    }

    // =========================================================================
    // EMBEDDED BALANCES
    // =========================================================================

    /// K1 pays K2 twice from inside one aggregate.
    fn double_payment(keys: &Keys, first: u64, second: u64) -> Vec<u8> {
        let payments = [first, second]
            .into_iter()
            .map(|amount| {
                embedded(
                    keys,
                    1,
                    EntityType::TRANSFER,
                    transfer_payload(keys.address(2).to_unresolved(), CURRENCY, Amount(amount)),
                )
            })
            .collect();
        aggregate(keys, 1, EntityType::AGGREGATE_COMPLETE, payments, &[]).bytes
    }

    #[test]
    fn test_embedded_transfers_share_signer_balance() {
        let keys = Keys::new(3);
        let mut service = funded_chain(&keys);
        let seeded = service.state_hash().unwrap();

        let result = service.apply_block(&block(2, vec![double_payment(&keys, 60_000, 60_000)]));

        assert!(matches!(
            result,
            Err(ExecutionError::Rejected { result, .. }) if result == FAILURE_CORE_INSUFFICIENT_BALANCE
        ));
        assert_eq!(service.state_hash().unwrap(), seeded);
        assert_eq!(service.height(), Height(1));
    }

    #[test]
    fn test_embedded_transfers_within_balance_apply() {
        let keys = Keys::new(3);
        let mut service = funded_chain(&keys);

        service
            .apply_block(&block(2, vec![double_payment(&keys, 40_000, 40_000)]))
            .unwrap();
        assert_eq!(balance(&service, &keys.address(2), CURRENCY), Amount(80_000));
    }
}
