//! # Fee and Address Flows
//!
//! Core validation scenarios checked through the fully assembled validator
//! and through block execution:
//!
//! - a fee above the signer's max fee is rejected, a zero fee is accepted
//! - a corrupted address checksum is rejected on every network

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        balance, block, builder, chain, fee_of, network_config, signed, transfer, transfer_payload, Keys,
        ALL_PLUGINS, CURRENCY, NETWORK,
    };
    use cc_02_model::{AccountAddressNotification, Notification, ResolverContext, TransactionFeeNotification};
    use cc_03_validators::ValidatorContext;
    use cc_05_plugins::{load_plugins, PluginBundle};
    use cc_06_pipeline::ExecutionError;
    use shared_types::{
        public_key_to_address, Amount, BlockFeeMultiplier, EntityType, Height, Key, NetworkIdentifier, Timestamp,
        ValidationResult, ADDRESS_DECODED_SIZE, FAILURE_CORE_INVALID_ADDRESS, FAILURE_CORE_INVALID_TRANSACTION_FEE,
    };

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn validate(bundle: &PluginBundle, notification: Notification) -> ValidationResult {
        let view = bundle.cache.create_view();
        let resolver_context = ResolverContext::without_mempool(&bundle.resolvers);
        let context = ValidatorContext::new(
            Height(1),
            Timestamp(0),
            &bundle.config,
            view.as_read_only(),
            &resolver_context,
        );
        bundle.validator.validate_all(&[notification], &context)
    }

    fn fee_notification(transaction_size: u32, fee: u64, max_fee: u64) -> Notification {
        TransactionFeeNotification {
            transaction_size,
            fee: Amount(fee),
            max_fee: Amount(max_fee),
        }
        .into()
    }

    // =========================================================================
    // FEE
    // =========================================================================

    #[test]
    fn test_fee_above_max_fee_is_rejected() {
        let bundle = load_plugins(network_config(), &ALL_PLUGINS).unwrap();
        assert_eq!(
            validate(&bundle, fee_notification(300, 235, 234)),
            FAILURE_CORE_INVALID_TRANSACTION_FEE
        );
    }

    #[test]
    fn test_zero_fee_is_accepted() {
        let bundle = load_plugins(network_config(), &ALL_PLUGINS).unwrap();
        assert_eq!(validate(&bundle, fee_notification(200, 0, 234)), ValidationResult::SUCCESS);
    }

    #[test]
    fn test_block_with_underpaying_transaction_is_rejected() {
        let keys = Keys::new(2);
        let (mut service, _sink) = chain();
        service
            .seed(|delta| keys.fund(delta, 0, Amount(100_000)))
            .unwrap();

        let payload = transfer_payload(keys.address(1).to_unresolved(), CURRENCY, Amount(10));
        let bytes = builder(&keys, 0, EntityType::TRANSFER, payload)
            .max_fee(Amount(10))
            .sign_with(|data| keys.sign(0, data));

        let result = service.apply_block(&block(2, vec![bytes]));
        match result {
            Err(ExecutionError::Rejected { index, result, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(result, FAILURE_CORE_INVALID_TRANSACTION_FEE);
            }
            other => panic!("expected fee rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_fee_follows_block_multiplier() {
        let keys = Keys::new(2);
        let (mut service, _sink) = chain();
        service
            .seed(|delta| keys.fund(delta, 0, Amount(100_000)))
            .unwrap();

        let first = transfer(&keys, 0, 1, 10);
        service.apply_block(&block(2, vec![first.clone()])).unwrap();
        assert_eq!(
            balance(&service, &keys.address(0), CURRENCY),
            Amount(100_000 - 10 - fee_of(&first).0)
        );

        let mut free = block(3, vec![transfer(&keys, 0, 1, 10)]);
        free.fee_multiplier = BlockFeeMultiplier(0);
        service.apply_block(&free).unwrap();
        assert_eq!(
            balance(&service, &keys.address(0), CURRENCY),
            Amount(100_000 - 20 - fee_of(&first).0)
        );
    }

    // =========================================================================
    // ADDRESS CHECKSUM
    // =========================================================================

    #[test]
    fn test_corrupted_checksum_is_rejected_on_every_network() {
        for network in [NetworkIdentifier::MIJIN_TEST, NetworkIdentifier::PUBLIC] {
            let mut config = network_config();
            config.network = network;
            let bundle = load_plugins(config, &ALL_PLUGINS).unwrap();

            let valid = public_key_to_address(&Key([9; 32]), network).to_unresolved();
            assert_eq!(
                validate(&bundle, AccountAddressNotification { address: valid }.into()),
                ValidationResult::SUCCESS
            );

            let mut corrupted = valid;
            corrupted.0[ADDRESS_DECODED_SIZE / 2] ^= 0xFF;
            assert_eq!(
                validate(&bundle, AccountAddressNotification { address: corrupted }.into()),
                FAILURE_CORE_INVALID_ADDRESS
            );
        }
    }

    #[test]
    fn test_transfer_to_corrupted_address_leaves_state_untouched() {
        let keys = Keys::new(2);
        let (mut service, _sink) = chain();
        service
            .seed(|delta| keys.fund(delta, 0, Amount(100_000)))
            .unwrap();
        let before = service.state_hash().unwrap();

        let mut recipient = public_key_to_address(&keys.key(1), NETWORK).to_unresolved();
        recipient.0[ADDRESS_DECODED_SIZE / 2] ^= 0xFF;
        let bytes = signed(
            &keys,
            0,
            EntityType::TRANSFER,
            transfer_payload(recipient, CURRENCY, Amount(10)),
        );

        let result = service.apply_block(&block(2, vec![bytes]));
        assert!(matches!(
            result,
            Err(ExecutionError::Rejected { result, .. }) if result == FAILURE_CORE_INVALID_ADDRESS
        ));
        assert_eq!(service.state_hash().unwrap(), before);
        assert_eq!(service.height(), Height(1));
    }
}
