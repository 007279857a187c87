//! Balance checks for transfers and debits.
//!
//! Both validators resolve the mosaic and amount first, so a deferred amount
//! is checked at the value the observers will later apply. Approved amounts
//! are reserved in the context tally, so a transaction cannot spend the same
//! balance twice across its notifications.

use crate::context::ValidatorContext;
use crate::validator::StatefulValidator;
use cc_02_model::{BalanceDebitNotification, BalanceTransferNotification, UnresolvedAmount};
use shared_types::{Address, Amount, Key, UnresolvedMosaicId, ValidationResult, FAILURE_CORE_INSUFFICIENT_BALANCE};
use tracing::debug;

fn reserve(
    sender: &Key,
    mosaic_id: UnresolvedMosaicId,
    amount: &UnresolvedAmount,
    context: &ValidatorContext<'_>,
) -> Result<(Address, Amount), ValidationResult> {
    let mosaic_id = context.resolve_mosaic_id(mosaic_id);
    let amount = context.resolve_amount(amount).map_err(|error| {
        debug!("[Validator] amount could not be resolved: {}", error);
        ValidationResult::FAILURE
    })?;

    let sender = context.address_of(sender);
    if context.reserve_debit(&sender, mosaic_id, amount) {
        Ok((sender, amount))
    } else {
        Err(FAILURE_CORE_INSUFFICIENT_BALANCE)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BalanceTransferValidator;

impl StatefulValidator<BalanceTransferNotification> for BalanceTransferValidator {
    fn name(&self) -> &str {
        "BalanceTransferValidator"
    }

    fn validate(
        &self,
        notification: &BalanceTransferNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        match reserve(&notification.sender, notification.mosaic_id, &notification.amount, context) {
            Ok((_, amount)) => {
                let recipient = context.resolve_address(&notification.recipient);
                context.record_credit(&recipient, context.resolve_mosaic_id(notification.mosaic_id), amount);
                ValidationResult::SUCCESS
            }
            Err(result) => result,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BalanceDebitValidator;

impl StatefulValidator<BalanceDebitNotification> for BalanceDebitValidator {
    fn name(&self) -> &str {
        "BalanceDebitValidator"
    }

    fn validate(
        &self,
        notification: &BalanceDebitNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        match reserve(&notification.sender, notification.mosaic_id, &notification.amount, context) {
            Ok(_) => ValidationResult::SUCCESS,
            Err(result) => result,
        }
    }
}
