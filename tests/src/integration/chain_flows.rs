//! # Chain Service Flows
//!
//! Block application through `ChainService`: finalization fan-out, plugin
//! loading from configuration, block level limits, undo depth and metrics.

#[cfg(test)]
mod tests {
    use crate::fixtures::{block, chain, network_config, signed, transfer, Keys, ALL_PLUGINS, CURRENCY};
    use catapult_telemetry::{encode_metrics, register_metrics, BLOCKS_COMMITTED, BLOCKS_ROLLED_BACK};
    use cc_05_plugins::transfer::TransferTransaction;
    use cc_05_plugins::{PluginError, PluginId};
    use cc_06_pipeline::{ChainService, ExecutionConfig, ExecutionError, FinalizedBlock};
    use shared_types::{
        Amount, EntityType, Height, UnresolvedMosaic, FAILURE_CORE_PLUGIN_CONFIG_MALFORMED,
        FAILURE_CORE_TOO_MANY_TRANSACTIONS,
    };
    use std::time::Duration;
    use tokio::time::timeout;

    fn seeded(service: &mut ChainService, keys: &Keys) {
        service
            .seed(|delta| keys.fund(delta, 0, Amount(1_000_000)))
            .unwrap();
    }

    // =========================================================================
    // FINALIZATION
    // =========================================================================

    #[tokio::test]
    async fn test_subscriber_receives_blocks_in_order() {
        let keys = Keys::new(3);
        let (mut service, sink) = chain();
        seeded(&mut service, &keys);

        let mut receiver = sink.subscribe();
        let collector = tokio::spawn(async move {
            let mut received: Vec<FinalizedBlock> = Vec::new();
            while received.len() < 3 {
                match receiver.recv().await {
                    Ok(finalized) => received.push(finalized),
                    Err(_) => break,
                }
            }
            received
        });

        let mut applied = Vec::new();
        for height in 2..=4 {
            applied.push(
                service
                    .apply_block(&block(height, vec![transfer(&keys, 0, 1, height)]))
                    .unwrap(),
            );
        }

        let received = timeout(Duration::from_secs(1), collector)
            .await
            .expect("timeout waiting for summaries")
            .expect("collector finished");
        assert_eq!(received, applied);
        assert_eq!(
            received.iter().map(|finalized| finalized.height).collect::<Vec<_>>(),
            vec![Height(2), Height(3), Height(4)]
        );
    }

    #[test]
    fn test_rejected_block_is_not_published() {
        let keys = Keys::new(3);
        let (mut service, sink) = chain();
        seeded(&mut service, &keys);
        let mut receiver = sink.subscribe();

        assert!(service
            .apply_block(&block(2, vec![transfer(&keys, 2, 1, 5)]))
            .is_err());
        assert!(receiver.try_recv().is_err());
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    #[test]
    fn test_service_from_json_config() {
        let execution: ExecutionConfig = serde_json::from_str(
            r#"{ "plugins": ["transfer", "multisig", "aggregate"], "max_undo_records": 2, "record_metrics": false }"#,
        )
        .unwrap();
        let (service, _sink) = ChainService::from_config(network_config(), &execution).unwrap();

        assert_eq!(
            service.plugins(),
            &[PluginId::Transfer, PluginId::Multisig, PluginId::Aggregate]
        );
        assert_eq!(service.height(), Height(0));
    }

    #[test]
    fn test_unknown_plugin_fails_startup() {
        let execution = ExecutionConfig::with_plugins(&["transfer", "teleport"]);
        let error = ChainService::from_config(network_config(), &execution).err();

        assert_eq!(
            error,
            Some(ExecutionError::Plugin(PluginError::UnknownPlugin {
                name: "teleport".to_string()
            }))
        );
    }

    #[test]
    fn test_lock_plugin_requires_aggregate() {
        let execution = ExecutionConfig::with_plugins(&["transfer", "lockhash"]);
        let error = ChainService::from_config(network_config(), &execution).err();

        assert!(matches!(
            error,
            Some(ExecutionError::Plugin(PluginError::MissingDependency { .. }))
        ));
    }

    #[test]
    fn test_malformed_plugin_config_rejects_transfer_messages() {
        let keys = Keys::new(3);
        let config = network_config().with_plugin_property("plugin:transfer", "maxMessageSize", "lots");
        let execution = ExecutionConfig {
            record_metrics: false,
            ..ExecutionConfig::with_plugins(&ALL_PLUGINS)
        };
        let (mut service, _sink) = ChainService::from_config(config, &execution).unwrap();
        seeded(&mut service, &keys);

        let payload = TransferTransaction {
            recipient: keys.address(1).to_unresolved(),
            message: b"hello".to_vec(),
            mosaics: vec![UnresolvedMosaic {
                mosaic_id: CURRENCY.to_unresolved(),
                amount: Amount(5),
            }],
        }
        .to_payload();
        let with_message = signed(&keys, 0, EntityType::TRANSFER, payload);

        let result = service.apply_block(&block(2, vec![with_message]));
        assert!(matches!(
            result,
            Err(ExecutionError::Rejected { result, .. }) if result == FAILURE_CORE_PLUGIN_CONFIG_MALFORMED
        ));
    }

    // =========================================================================
    // BLOCK LIMITS AND UNDO DEPTH
    // =========================================================================

    #[test]
    fn test_block_with_too_many_transactions_is_rejected() {
        let keys = Keys::new(3);
        let mut config = network_config();
        config.max_transactions_per_block = 2;
        let execution = ExecutionConfig {
            record_metrics: false,
            ..ExecutionConfig::with_plugins(&ALL_PLUGINS)
        };
        let (mut service, _sink) = ChainService::from_config(config, &execution).unwrap();
        seeded(&mut service, &keys);

        let transactions = (1..=3).map(|amount| transfer(&keys, 0, 1, amount)).collect();
        assert_eq!(
            service.apply_block(&block(2, transactions)),
            Err(ExecutionError::BlockRejected {
                height: Height(2),
                result: FAILURE_CORE_TOO_MANY_TRANSACTIONS
            })
        );
    }

    #[test]
    fn test_undo_depth_defaults_to_rollback_limit() {
        let keys = Keys::new(3);
        let mut config = network_config();
        config.max_rollback_blocks = 2;
        let execution = ExecutionConfig {
            record_metrics: false,
            ..ExecutionConfig::with_plugins(&ALL_PLUGINS)
        };
        let (mut service, _sink) = ChainService::from_config(config, &execution).unwrap();
        seeded(&mut service, &keys);

        for height in 2..=5 {
            service
                .apply_block(&block(height, vec![transfer(&keys, 0, 1, 1)]))
                .unwrap();
        }

        assert_eq!(service.undo_records(), 2);
        assert_eq!(service.undo_last_block().unwrap(), Height(4));
        assert_eq!(service.undo_last_block().unwrap(), Height(3));
        assert_eq!(service.undo_last_block(), Err(ExecutionError::NothingToUndo));
        assert_eq!(service.height(), Height(3));
    }

    // =========================================================================
    // METRICS
    // =========================================================================

    #[test]
    fn test_metrics_follow_commits_and_rollbacks() {
        let _ = register_metrics();
        let keys = Keys::new(3);
        let execution = ExecutionConfig::with_plugins(&ALL_PLUGINS);
        let (mut service, _sink) = ChainService::from_config(network_config(), &execution).unwrap();
        seeded(&mut service, &keys);

        let committed = BLOCKS_COMMITTED.get();
        let rolled_back = BLOCKS_ROLLED_BACK.get();

        service
            .apply_block(&block(2, vec![transfer(&keys, 0, 1, 1)]))
            .unwrap();
        service.undo_last_block().unwrap();

        assert!(BLOCKS_COMMITTED.get() >= committed + 1.0);
        assert!(BLOCKS_ROLLED_BACK.get() >= rolled_back + 1.0);

        let text = encode_metrics().unwrap();
        assert!(text.contains("catapult_chain_blocks_committed_total"));
    }
}
