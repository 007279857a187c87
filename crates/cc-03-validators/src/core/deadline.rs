use crate::context::ValidatorContext;
use crate::validator::StatefulValidator;
use cc_02_model::TransactionDeadlineNotification;
use shared_types::{ValidationResult, FAILURE_CORE_FUTURE_DEADLINE, FAILURE_CORE_PAST_DEADLINE};

/// Accepts deadlines in `[block_time, block_time + lifetime]`.
///
/// A zero lifetime on the notification means the network's
/// `max_transaction_lifetime`.
#[derive(Debug, Clone, Default)]
pub struct DeadlineValidator;

impl StatefulValidator<TransactionDeadlineNotification> for DeadlineValidator {
    fn name(&self) -> &str {
        "DeadlineValidator"
    }

    fn validate(
        &self,
        notification: &TransactionDeadlineNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        if notification.deadline < context.block_time {
            return FAILURE_CORE_PAST_DEADLINE;
        }

        let lifetime = if notification.max_lifetime.millis() == 0 {
            context.config.max_transaction_lifetime
        } else {
            notification.max_lifetime
        };

        match context.block_time.checked_add(lifetime) {
            Some(latest) if notification.deadline > latest => FAILURE_CORE_FUTURE_DEADLINE,
            _ => ValidationResult::SUCCESS,
        }
    }
}
