//! # Determinism
//!
//! Two independently assembled nodes fed the same blocks must agree on every
//! state hash, statement hash and notification stream.

#[cfg(test)]
mod tests {
    use crate::fixtures::{
        aggregate, block, chain, embedded, multisig_payload, network_config, transfer, Keys, ALL_PLUGINS,
    };
    use cc_02_model::{CosignatoryModificationType, Notification, ResolverContext, UnresolvedAmount};
    use cc_05_plugins::{load_plugins, PluginBundle};
    use cc_06_pipeline::{Block, FinalizedBlock, TransactionExecutor};
    use shared_types::{Amount, EntityType, Hash256};

    fn blocks(keys: &Keys) -> Vec<Block> {
        let conversion = aggregate(
            keys,
            1,
            EntityType::AGGREGATE_COMPLETE,
            vec![embedded(
                keys,
                1,
                EntityType::MODIFY_MULTISIG_ACCOUNT,
                multisig_payload(1, 1, &[(CosignatoryModificationType::Add, keys.key(2))]),
            )],
            &[2],
        );

        vec![
            block(2, vec![transfer(keys, 0, 1, 50_000), transfer(keys, 0, 2, 1_000)]),
            block(3, vec![conversion.bytes]),
            block(4, vec![transfer(keys, 1, 3, 700)]),
        ]
    }

    fn run(keys: &Keys) -> Vec<FinalizedBlock> {
        let (mut service, _sink) = chain();
        service
            .seed(|delta| keys.fund(delta, 0, Amount(1_000_000)))
            .unwrap();
        blocks(keys)
            .iter()
            .map(|block| service.apply_block(block).unwrap())
            .collect()
    }

    #[test]
    fn test_independent_nodes_agree() {
        let keys = Keys::new(4);
        let first = run(&keys);
        let second = run(&keys);

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_state_hashes_change_per_block() {
        let keys = Keys::new(4);
        let summaries = run(&keys);

        assert_ne!(summaries[0].state_hash, summaries[1].state_hash);
        assert_ne!(summaries[1].state_hash, summaries[2].state_hash);
    }

    /// Notifications of `bytes` with deferred amounts resolved against an empty cache.
    fn materialized(bundle: &PluginBundle, bytes: &[u8], block: &Block) -> (Hash256, Vec<Notification>) {
        let executor = TransactionExecutor::new(bundle, false);
        let published = executor.publish(bytes, &block.context()).unwrap();
        let view = bundle.cache.create_view();
        let resolver_context = ResolverContext::new(&bundle.resolvers, &published.mempool);

        let notifications = published
            .notifications
            .iter()
            .map(|notification| {
                notification
                    .materialize(|deferred| {
                        resolver_context.resolve_amount(view.as_read_only(), &UnresolvedAmount::Deferred(*deferred))
                    })
                    .unwrap()
            })
            .collect();
        (published.hash, notifications)
    }

    #[test]
    fn test_notification_stream_is_pure_function_of_bytes() {
        let keys = Keys::new(4);
        let first = load_plugins(network_config(), &ALL_PLUGINS).unwrap();
        let second = load_plugins(network_config(), &ALL_PLUGINS).unwrap();

        for block in blocks(&keys) {
            for bytes in &block.transactions {
                let left = materialized(&first, bytes, &block);
                let right = materialized(&second, bytes, &block);
                let again = materialized(&first, bytes, &block);

                assert!(!left.1.is_empty());
                assert_eq!(left, right);
                assert_eq!(left, again);
            }
        }
    }
}
