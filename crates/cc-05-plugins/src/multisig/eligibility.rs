use super::MultisigCacheDescriptor;
use crate::aggregate::{AggregateConfiguration, FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS};
use cc_01_cache::ReadOnlySubCache;
use cc_02_model::{
    AggregateCosignaturesNotification, BlockchainConfiguration, EmbeddedTransaction, TransactionRegistry,
};
use cc_03_validators::{StatefulValidator, ValidatorContext};
use shared_types::{Key, ValidationResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::trace;

/// Keys allowed to cosign an aggregate carrying `transactions`.
///
/// Every embedded signer, every key below it in the committed multisig graph,
/// and any keys the embedded plugins ask for (new cosignatories added inside
/// the same aggregate). Removing a cosignatory in the same aggregate does not
/// revoke its eligibility since the committed graph still contains it.
pub fn find_eligible_cosigners(
    multisig: ReadOnlySubCache<'_, MultisigCacheDescriptor>,
    registry: &TransactionRegistry,
    config: &BlockchainConfiguration,
    transactions: &[EmbeddedTransaction],
) -> BTreeSet<Key> {
    let mut eligible = BTreeSet::new();
    for transaction in transactions {
        add_cosignatory_closure(multisig, transaction.header.signer, &mut eligible);

        if let Some(plugin) = registry.find_embedded(transaction.header.entity_type) {
            eligible.extend(plugin.additional_required_cosigners(transaction, config));
        }
    }

    eligible
}

fn add_cosignatory_closure(
    multisig: ReadOnlySubCache<'_, MultisigCacheDescriptor>,
    root: Key,
    eligible: &mut BTreeSet<Key>,
) {
    let mut pending = vec![root];
    while let Some(key) = pending.pop() {
        if !eligible.insert(key) {
            continue;
        }

        if let Some(entry) = multisig.find(&key) {
            pending.extend(entry.cosignatories.iter().copied());
        }
    }
}

/// Every cosignature of an aggregate must come from an eligible key.
pub struct MultisigAggregateEligibleCosignersValidator {
    registry: Arc<TransactionRegistry>,
}

impl MultisigAggregateEligibleCosignersValidator {
    pub fn new(registry: Arc<TransactionRegistry>) -> Self {
        Self { registry }
    }
}

impl StatefulValidator<AggregateCosignaturesNotification> for MultisigAggregateEligibleCosignersValidator {
    fn name(&self) -> &str {
        "MultisigAggregateEligibleCosignersValidator"
    }

    fn validate(
        &self,
        notification: &AggregateCosignaturesNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        let Ok(multisig) = context.cache.try_sub::<MultisigCacheDescriptor>() else {
            return ValidationResult::FAILURE;
        };

        let eligible = find_eligible_cosigners(multisig, &self.registry, context.config, &notification.transactions);

        let strict_signer = context
            .config
            .plugin_config::<AggregateConfiguration>()
            .map(|aggregate_config| aggregate_config.enable_strict_cosignature_check)
            .unwrap_or(false);
        if strict_signer && !eligible.contains(&notification.signer) {
            trace!("[Multisig] aggregate signer {} is not eligible", notification.signer);
            return FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS;
        }

        match notification
            .cosignatures
            .iter()
            .find(|cosignature| !eligible.contains(&cosignature.signer))
        {
            Some(cosignature) => {
                trace!("[Multisig] cosigner {} is not eligible", cosignature.signer);
                FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS
            }
            None => ValidationResult::SUCCESS,
        }
    }
}
