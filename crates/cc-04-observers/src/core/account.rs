//! Observers that make accounts known to the account state cache.
//!
//! Rollback only queues the removal; the account disappears once the block
//! is fully undone and only if it is empty and was added at that height.

use crate::context::ObserverContext;
use crate::errors::ObserverError;
use crate::observer::{NotificationObserver, NotifyMode};
use cc_02_model::{AccountAddressNotification, AccountPublicKeyNotification};

#[derive(Debug, Clone, Default)]
pub struct AccountPublicKeyObserver;

impl NotificationObserver<AccountPublicKeyNotification> for AccountPublicKeyObserver {
    fn name(&self) -> &str {
        "AccountPublicKeyObserver"
    }

    fn notify(
        &self,
        notification: &AccountPublicKeyNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        match context.mode {
            NotifyMode::Commit => {
                let (network, height) = (context.network(), context.height);
                context
                    .accounts_mut()?
                    .add_account_with_key(notification.public_key, network, height);
            }
            NotifyMode::Rollback => context.queue_public_key_removal(notification.public_key),
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountAddressObserver;

impl NotificationObserver<AccountAddressNotification> for AccountAddressObserver {
    fn name(&self) -> &str {
        "AccountAddressObserver"
    }

    fn notify(
        &self,
        notification: &AccountAddressNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let address = context.resolve_address(&notification.address);
        match context.mode {
            NotifyMode::Commit => {
                let height = context.height;
                context.accounts_mut()?.add_account(address, height);
            }
            NotifyMode::Rollback => context.queue_address_removal(address),
        }

        Ok(())
    }
}
