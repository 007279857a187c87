use crate::validator::StatelessValidator;
use cc_02_model::AccountAddressNotification;
use shared_types::{
    is_valid_address, Address, NetworkIdentifier, ValidationResult, FAILURE_CORE_INVALID_ADDRESS,
};

/// Rejects addresses with a bad checksum or foreign network byte.
///
/// Namespace aliases are resolved later and always pass.
#[derive(Debug, Clone)]
pub struct AddressValidator {
    network: NetworkIdentifier,
}

impl AddressValidator {
    pub fn new(network: NetworkIdentifier) -> Self {
        Self { network }
    }
}

impl StatelessValidator<AccountAddressNotification> for AddressValidator {
    fn name(&self) -> &str {
        "AddressValidator"
    }

    fn validate(&self, notification: &AccountAddressNotification) -> ValidationResult {
        if notification.address.is_alias() {
            return ValidationResult::SUCCESS;
        }

        if is_valid_address(&Address(notification.address.0), self.network) {
            ValidationResult::SUCCESS
        } else {
            FAILURE_CORE_INVALID_ADDRESS
        }
    }
}
