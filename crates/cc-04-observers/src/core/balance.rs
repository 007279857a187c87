use crate::context::ObserverContext;
use crate::errors::ObserverError;
use crate::observer::{NotificationObserver, NotifyMode};
use crate::utils::{credit_balance, debit_balance, transfer_balance};
use cc_02_model::{BalanceDebitNotification, BalanceTransferNotification};

/// Moves the resolved amount from sender to recipient (reversed on rollback).
#[derive(Debug, Clone, Default)]
pub struct BalanceTransferObserver;

impl NotificationObserver<BalanceTransferNotification> for BalanceTransferObserver {
    fn name(&self) -> &str {
        "BalanceTransferObserver"
    }

    fn notify(
        &self,
        notification: &BalanceTransferNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let sender = context.address_of(&notification.sender);
        let recipient = context.resolve_address(&notification.recipient);
        let mosaic_id = context.resolve_mosaic_id(notification.mosaic_id);
        let amount = context.resolve_amount(&notification.amount)?;

        match context.mode {
            NotifyMode::Commit => transfer_balance(context, sender, recipient, mosaic_id, amount),
            NotifyMode::Rollback => transfer_balance(context, recipient, sender, mosaic_id, amount),
        }
    }
}

/// Removes the resolved amount from the sender (credited back on rollback).
#[derive(Debug, Clone, Default)]
pub struct BalanceDebitObserver;

impl NotificationObserver<BalanceDebitNotification> for BalanceDebitObserver {
    fn name(&self) -> &str {
        "BalanceDebitObserver"
    }

    fn notify(
        &self,
        notification: &BalanceDebitNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let sender = context.address_of(&notification.sender);
        let mosaic_id = context.resolve_mosaic_id(notification.mosaic_id);
        let amount = context.resolve_amount(&notification.amount)?;

        match context.mode {
            NotifyMode::Commit => debit_balance(context, sender, mosaic_id, amount),
            NotifyMode::Rollback => credit_balance(context, sender, mosaic_id, amount),
        }
    }
}
