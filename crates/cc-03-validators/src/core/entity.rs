use crate::context::ValidatorContext;
use crate::validator::{StatefulValidator, StatelessValidator};
use cc_02_model::{EntityNotification, TransactionRegistry};
use shared_types::{
    NetworkIdentifier, ValidationResult, FAILURE_CORE_INVALID_VERSION,
    FAILURE_CORE_UNKNOWN_ENTITY_TYPE, FAILURE_CORE_WRONG_NETWORK,
};
use std::sync::Arc;

/// Rejects entities signed for another network.
#[derive(Debug, Clone)]
pub struct NetworkValidator {
    network: NetworkIdentifier,
}

impl NetworkValidator {
    pub fn new(network: NetworkIdentifier) -> Self {
        Self { network }
    }
}

impl StatelessValidator<EntityNotification> for NetworkValidator {
    fn name(&self) -> &str {
        "NetworkValidator"
    }

    fn validate(&self, notification: &EntityNotification) -> ValidationResult {
        if notification.network == self.network {
            ValidationResult::SUCCESS
        } else {
            FAILURE_CORE_WRONG_NETWORK
        }
    }
}

/// Rejects entity types without a plugin and versions outside the plugin's
/// range at the current height.
pub struct EntityVersionValidator {
    registry: Arc<TransactionRegistry>,
}

impl EntityVersionValidator {
    pub fn new(registry: Arc<TransactionRegistry>) -> Self {
        Self { registry }
    }
}

impl StatefulValidator<EntityNotification> for EntityVersionValidator {
    fn name(&self) -> &str {
        "EntityVersionValidator"
    }

    fn validate(&self, notification: &EntityNotification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Some(plugin) = self.registry.find(notification.entity_type) else {
            return FAILURE_CORE_UNKNOWN_ENTITY_TYPE;
        };

        if plugin
            .attributes(context.height)
            .supports(notification.entity_version)
        {
            ValidationResult::SUCCESS
        } else {
            FAILURE_CORE_INVALID_VERSION
        }
    }
}
