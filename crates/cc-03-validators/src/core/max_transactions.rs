use crate::validator::StatelessValidator;
use cc_02_model::BlockNotification;
use shared_types::{ValidationResult, FAILURE_CORE_TOO_MANY_TRANSACTIONS};

/// Caps the number of transactions in one block.
#[derive(Debug, Clone)]
pub struct MaxTransactionsValidator {
    max_transactions: u32,
}

impl MaxTransactionsValidator {
    pub fn new(max_transactions: u32) -> Self {
        Self { max_transactions }
    }
}

impl StatelessValidator<BlockNotification> for MaxTransactionsValidator {
    fn name(&self) -> &str {
        "MaxTransactionsValidator"
    }

    fn validate(&self, notification: &BlockNotification) -> ValidationResult {
        if notification.transactions_count > self.max_transactions {
            FAILURE_CORE_TOO_MANY_TRANSACTIONS
        } else {
            ValidationResult::SUCCESS
        }
    }
}
