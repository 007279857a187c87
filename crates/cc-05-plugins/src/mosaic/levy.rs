use cc_02_model::{MosaicLevyTransferNotification, Receipt, ReceiptBody, ReceiptType};
use cc_03_validators::{StatefulValidator, ValidatorContext};
use cc_04_observers::utils::transfer_balance;
use cc_04_observers::{NotificationObserver, NotifyMode, ObserverContext, ObserverError};
use shared_types::{facility, ValidationResult};
use tracing::debug;

pub const FAILURE_MOSAIC_LEVY_INSUFFICIENT_BALANCE: ValidationResult =
    ValidationResult::failure(facility::MOSAIC, 1);

/// Sender must hold the levy in the levy mosaic.
#[derive(Debug, Clone, Default)]
pub struct MosaicLevyTransferValidator;

impl StatefulValidator<MosaicLevyTransferNotification> for MosaicLevyTransferValidator {
    fn name(&self) -> &str {
        "MosaicLevyTransferValidator"
    }

    fn validate(
        &self,
        notification: &MosaicLevyTransferNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        let mosaic_id = context.resolve_mosaic_id(notification.mosaic_id);
        let Some(recipient) = context.resolvers.resolve_levy_address(context.cache, mosaic_id) else {
            return ValidationResult::SUCCESS;
        };

        let fee = match context.resolve_amount(&notification.fee) {
            Ok(fee) => fee,
            Err(error) => {
                debug!("[MosaicLevy] fee could not be resolved: {}", error);
                return ValidationResult::FAILURE;
            }
        };

        if fee.is_zero() {
            return ValidationResult::SUCCESS;
        }

        let levy_mosaic_id = context.resolvers.resolve_levy_mosaic(context.cache, mosaic_id);
        let sender = context.address_of(&notification.sender);
        if !context.reserve_debit(&sender, levy_mosaic_id, fee) {
            return FAILURE_MOSAIC_LEVY_INSUFFICIENT_BALANCE;
        }

        context.record_credit(&recipient, levy_mosaic_id, fee);
        ValidationResult::SUCCESS
    }
}

/// Pays the levy to its recipient and records a `MosaicLevy` receipt.
#[derive(Debug, Clone, Default)]
pub struct MosaicLevyTransferObserver;

impl NotificationObserver<MosaicLevyTransferNotification> for MosaicLevyTransferObserver {
    fn name(&self) -> &str {
        "MosaicLevyTransferObserver"
    }

    fn notify(
        &self,
        notification: &MosaicLevyTransferNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let mosaic_id = context.resolve_mosaic_id(notification.mosaic_id);
        let Some(recipient) = context.resolve_levy_address(mosaic_id) else {
            return Ok(());
        };

        let fee = context.resolve_amount(&notification.fee)?;
        if fee.is_zero() {
            return Ok(());
        }

        let levy_mosaic_id = context.resolve_levy_mosaic(mosaic_id);
        let sender = context.address_of(&notification.sender);
        let height = context.height;

        match context.mode {
            NotifyMode::Commit => {
                context.accounts_mut()?.add_account(recipient, height);
                transfer_balance(context, sender, recipient, levy_mosaic_id, fee)?;
                context.add_receipt(Receipt::new(
                    ReceiptType::MOSAIC_LEVY,
                    ReceiptBody::BalanceTransfer {
                        sender,
                        recipient,
                        mosaic_id: levy_mosaic_id,
                        amount: fee,
                    },
                ));
            }
            NotifyMode::Rollback => {
                transfer_balance(context, recipient, sender, levy_mosaic_id, fee)?;
                context.queue_address_removal(recipient);
            }
        }

        Ok(())
    }
}
