use cc_02_model::AggregateCosignaturesNotification;
use cc_03_validators::StatelessValidator;
use shared_types::{facility, ValidationResult};
use std::collections::BTreeSet;

pub const FAILURE_AGGREGATE_TOO_MANY_TRANSACTIONS: ValidationResult = ValidationResult::failure(facility::AGGREGATE, 1);
pub const FAILURE_AGGREGATE_NO_TRANSACTIONS: ValidationResult = ValidationResult::failure(facility::AGGREGATE, 2);
pub const FAILURE_AGGREGATE_TOO_MANY_COSIGNATURES: ValidationResult = ValidationResult::failure(facility::AGGREGATE, 3);
pub const FAILURE_AGGREGATE_REDUNDANT_COSIGNATURES: ValidationResult = ValidationResult::failure(facility::AGGREGATE, 4);
pub const FAILURE_AGGREGATE_INELIGIBLE_COSIGNERS: ValidationResult = ValidationResult::failure(facility::AGGREGATE, 101);

/// Structural limits on an aggregate's transactions and cosignatures.
///
/// The aggregate signer counts toward the cosignature limit and must not
/// cosign its own aggregate.
#[derive(Debug, Clone)]
pub struct BasicAggregateCosignaturesValidator {
    max_transactions: u32,
    max_cosignatures: u8,
}

impl BasicAggregateCosignaturesValidator {
    pub fn new(max_transactions: u32, max_cosignatures: u8) -> Self {
        Self {
            max_transactions,
            max_cosignatures,
        }
    }
}

impl StatelessValidator<AggregateCosignaturesNotification> for BasicAggregateCosignaturesValidator {
    fn name(&self) -> &str {
        "BasicAggregateCosignaturesValidator"
    }

    fn validate(&self, notification: &AggregateCosignaturesNotification) -> ValidationResult {
        if notification.transactions.is_empty() {
            return FAILURE_AGGREGATE_NO_TRANSACTIONS;
        }

        if notification.transactions.len() > self.max_transactions as usize {
            return FAILURE_AGGREGATE_TOO_MANY_TRANSACTIONS;
        }

        if notification.cosignatures.len() + 1 > usize::from(self.max_cosignatures) {
            return FAILURE_AGGREGATE_TOO_MANY_COSIGNATURES;
        }

        let mut cosigners = BTreeSet::from([notification.signer]);
        for cosignature in notification.cosignatures.iter() {
            if !cosigners.insert(cosignature.signer) {
                return FAILURE_AGGREGATE_REDUNDANT_COSIGNATURES;
            }
        }

        ValidationResult::SUCCESS
    }
}
