use crate::validator::StatelessValidator;
use cc_02_model::TransactionFeeNotification;
use shared_types::{ValidationResult, FAILURE_CORE_INVALID_TRANSACTION_FEE};

/// Rejects fees above the signer's max fee, and max fees whose implied
/// per-byte multiplier does not fit 32 bits.
#[derive(Debug, Clone, Default)]
pub struct TransactionFeeValidator;

impl StatelessValidator<TransactionFeeNotification> for TransactionFeeValidator {
    fn name(&self) -> &str {
        "TransactionFeeValidator"
    }

    fn validate(&self, notification: &TransactionFeeNotification) -> ValidationResult {
        if notification.fee > notification.max_fee {
            return FAILURE_CORE_INVALID_TRANSACTION_FEE;
        }

        let multiplier = notification
            .max_fee
            .0
            .checked_div(u64::from(notification.transaction_size));
        match multiplier {
            Some(multiplier) if multiplier <= u64::from(u32::MAX) => ValidationResult::SUCCESS,
            _ => FAILURE_CORE_INVALID_TRANSACTION_FEE,
        }
    }
}
