//! # Notification Publisher
//!
//! Publishes the notifications shared by every transaction type, followed by
//! the plugin's own notifications.
//!
//! Basic notifications, in order:
//!
//! 1. `SourceChange` (primary +1, secondary = 0)
//! 2. `AccountPublicKey` (signer)
//! 3. `Entity`
//! 4. `Transaction`
//! 5. `TransactionDeadline`
//! 6. `Signer`
//! 7. `TransactionFee`
//! 8. `BalanceDebit` (fee in the currency mosaic)
//! 9. `Signature`

use crate::errors::DecodeError;
use crate::notifications::{
    AccountPublicKeyNotification, BalanceDebitNotification, EntityNotification,
    SignatureNotification, SignerNotification, SourceChangeNotification, SourceChangeType,
    TransactionDeadlineNotification, TransactionFeeNotification, TransactionNotification,
};
use crate::plugin::{TransactionInfo, TransactionPlugin};
use crate::registry::TransactionRegistry;
use crate::subscriber::NotificationSubscriber;
use crate::UnresolvedAmount;
use shared_types::{Amount, BlockFeeMultiplier, MosaicId};
use std::sync::Arc;

/// Which notification groups to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicationMode {
    /// Only the notifications shared by all transactions.
    Basic,
    /// Only the plugin notifications.
    Custom,
    #[default]
    All,
}

pub struct NotificationPublisher {
    registry: Arc<TransactionRegistry>,
    fee_mosaic_id: MosaicId,
    mode: PublicationMode,
}

impl NotificationPublisher {
    pub fn new(registry: Arc<TransactionRegistry>, fee_mosaic_id: MosaicId, mode: PublicationMode) -> Self {
        Self {
            registry,
            fee_mosaic_id,
            mode,
        }
    }

    pub fn registry(&self) -> &Arc<TransactionRegistry> {
        &self.registry
    }

    /// Fee charged for `size` bytes under `multiplier`.
    pub fn calculate_fee(size: u32, multiplier: BlockFeeMultiplier) -> Amount {
        Amount(u64::from(size).saturating_mul(u64::from(multiplier.0)))
    }

    pub fn publish(
        &self,
        info: &TransactionInfo<'_>,
        fee_multiplier: BlockFeeMultiplier,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), DecodeError> {
        let entity_type = info.transaction.header.entity_type;
        let plugin = self
            .registry
            .find(entity_type)
            .ok_or(DecodeError::UnknownType { entity_type })?;

        if self.mode != PublicationMode::Custom {
            self.publish_basic(plugin, info, fee_multiplier, sub);
        }

        if self.mode != PublicationMode::Basic {
            plugin.publish(info, &self.registry, sub)?;
        }

        Ok(())
    }

    fn publish_basic(
        &self,
        plugin: &dyn TransactionPlugin,
        info: &TransactionInfo<'_>,
        fee_multiplier: BlockFeeMultiplier,
        sub: &mut dyn NotificationSubscriber,
    ) {
        let header = &info.transaction.header;
        let attributes = plugin.attributes(info.associated_height);
        let fee = Self::calculate_fee(header.size, fee_multiplier);

        sub.notify(
            SourceChangeNotification {
                primary_change_type: SourceChangeType::Relative,
                primary_id: 1,
                secondary_change_type: SourceChangeType::Absolute,
                secondary_id: 0,
            }
            .into(),
        );
        sub.notify(
            AccountPublicKeyNotification {
                public_key: header.signer,
            }
            .into(),
        );
        sub.notify(
            EntityNotification {
                network: header.network(),
                entity_type: header.entity_type,
                entity_version: header.entity_version(),
            }
            .into(),
        );
        sub.notify(
            TransactionNotification {
                signer: header.signer,
                transaction_hash: info.hash,
                transaction_type: header.entity_type,
                deadline: header.deadline,
            }
            .into(),
        );
        sub.notify(
            TransactionDeadlineNotification {
                deadline: header.deadline,
                max_lifetime: attributes.max_lifetime,
            }
            .into(),
        );
        sub.notify(SignerNotification { signer: header.signer }.into());
        sub.notify(
            TransactionFeeNotification {
                transaction_size: header.size,
                fee,
                max_fee: header.max_fee,
            }
            .into(),
        );
        sub.notify(
            BalanceDebitNotification {
                sender: header.signer,
                mosaic_id: self.fee_mosaic_id.to_unresolved(),
                amount: UnresolvedAmount::Concrete(fee),
            }
            .into(),
        );
        sub.notify(
            SignatureNotification {
                signer: header.signer,
                signature: header.signature,
                data: Arc::from(plugin.data_buffer(info.transaction)),
            }
            .into(),
        );
    }
}
