//! # Notifications
//!
//! Typed semantic events published for every transaction. Each payload type
//! has a fixed [`NotificationType`] whose channel mask decides whether it
//! reaches validators, observers or both.
//!
//! ```text
//! NotificationType (u32)
//!   bits 24..32  channel mask (1 = validator, 2 = observer)
//!   bits 16..24  facility
//!   bits  0..16  code
//! ```

use crate::amounts::{DeferredAmount, UnresolvedAmount};
use crate::transaction::{Cosignature, EmbeddedTransaction};
use shared_types::{
    facility, Amount, BlockDuration, EntityType, Hash256, Key, NetworkIdentifier, Signature,
    TimeSpan, Timestamp, UnresolvedAddress, UnresolvedMosaic, UnresolvedMosaicId,
};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// TYPE TAXONOMY
// =============================================================================

/// Pipeline stages a notification is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationChannel(pub u8);

impl NotificationChannel {
    pub const NONE: NotificationChannel = NotificationChannel(0);
    pub const VALIDATOR: NotificationChannel = NotificationChannel(1);
    pub const OBSERVER: NotificationChannel = NotificationChannel(2);
    pub const ALL: NotificationChannel = NotificationChannel(3);

    pub fn contains(self, other: NotificationChannel) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

/// Packed notification type: channel, facility and code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationType(pub u32);

impl NotificationType {
    pub const fn make(channel: NotificationChannel, facility: u8, code: u16) -> Self {
        Self((channel.0 as u32) << 24 | (facility as u32) << 16 | code as u32)
    }

    pub fn channel(self) -> NotificationChannel {
        NotificationChannel((self.0 >> 24) as u8)
    }

    pub fn facility(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn code(self) -> u16 {
        self.0 as u16
    }

    /// Type with the channel bits cleared, used as a dispatch key.
    pub fn without_channel(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }
}

impl fmt::Debug for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NotificationType(channel={}, facility=0x{:02X}, code={})",
            self.channel().0,
            self.facility(),
            self.code()
        )
    }
}

/// Implemented by every notification payload.
pub trait TypedNotification: Clone + fmt::Debug + Into<Notification> + Send + Sync + 'static {
    const NOTIFICATION_TYPE: NotificationType;

    /// Borrows the payload when `notification` carries this type.
    fn from_notification(notification: &Notification) -> Option<&Self>;
}

// =============================================================================
// CORE PAYLOADS
// =============================================================================

/// An account became known by address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountAddressNotification {
    pub address: UnresolvedAddress,
}

/// An account became known by public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPublicKeyNotification {
    pub public_key: Key,
}

/// A mosaic moves from a signer to a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceTransferNotification {
    pub sender: Key,
    pub recipient: UnresolvedAddress,
    pub mosaic_id: UnresolvedMosaicId,
    pub amount: UnresolvedAmount,
}

/// A mosaic leaves a signer's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDebitNotification {
    pub sender: Key,
    pub mosaic_id: UnresolvedMosaicId,
    pub amount: UnresolvedAmount,
}

/// Entity header summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNotification {
    pub network: NetworkIdentifier,
    pub entity_type: EntityType,
    pub entity_version: u32,
}

/// A transaction with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionNotification {
    pub signer: Key,
    pub transaction_hash: Hash256,
    pub transaction_type: EntityType,
    pub deadline: Timestamp,
}

/// Deadline with the lifetime allowed for the transaction type.
///
/// A zero `max_lifetime` means the network default applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDeadlineNotification {
    pub deadline: Timestamp,
    pub max_lifetime: TimeSpan,
}

/// Fee paid by a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFeeNotification {
    pub transaction_size: u32,
    pub fee: Amount,
    pub max_fee: Amount,
}

/// A key signed an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerNotification {
    pub signer: Key,
}

/// How a receipt source component changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChangeType {
    Absolute,
    Relative,
}

/// Receipt source update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChangeNotification {
    pub primary_change_type: SourceChangeType,
    pub primary_id: u32,
    pub secondary_change_type: SourceChangeType,
    pub secondary_id: u32,
}

/// Block summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNotification {
    pub timestamp: Timestamp,
    pub transactions_count: u32,
}

/// Signature to verify over `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureNotification {
    pub signer: Key,
    pub signature: Signature,
    pub data: Arc<[u8]>,
}

// =============================================================================
// PLUGIN PAYLOADS
// =============================================================================

/// Aggregate with all of its embedded transactions and cosignatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCosignaturesNotification {
    pub signer: Key,
    pub transactions: Arc<[EmbeddedTransaction]>,
    pub cosignatures: Arc<[Cosignature]>,
}

/// One embedded transaction with the cosignatures of its aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEmbeddedTransactionNotification {
    pub signer: Key,
    pub transaction: EmbeddedTransaction,
    pub cosignatures: Arc<[Cosignature]>,
}

/// Cosignatory modification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CosignatoryModificationType {
    Add = 1,
    Del = 2,
}

impl CosignatoryModificationType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Add),
            2 => Some(Self::Del),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CosignatoryModification {
    pub modification_type: CosignatoryModificationType,
    pub cosignatory_key: Key,
}

/// Cosignatories added to or removed from a multisig account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMultisigCosignersNotification {
    pub signer: Key,
    pub modifications: Vec<CosignatoryModification>,
}

/// A cosignatory joins a multisig account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMultisigNewCosignerNotification {
    pub multisig_account_key: Key,
    pub cosignatory_key: Key,
}

/// Approval and removal thresholds change.
///
/// The cosignatory counts are those of the modifications in the same
/// transaction, so settings can be checked against the resulting account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMultisigSettingsNotification {
    pub signer: Key,
    pub min_removal_delta: i8,
    pub min_approval_delta: i8,
    pub cosignatories_added: u8,
    pub cosignatories_removed: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMessageNotification {
    pub message_size: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMosaicsNotification {
    pub mosaics: Vec<UnresolvedMosaic>,
}

/// Levy owed for transferring `mosaic_id`; `fee` is deferred until observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicLevyTransferNotification {
    pub sender: Key,
    pub mosaic_id: UnresolvedMosaicId,
    pub fee: UnresolvedAmount,
}

/// Funds locked under a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLockNotification {
    pub signer: Key,
    pub mosaic: UnresolvedMosaic,
    pub duration: BlockDuration,
    pub hash: Hash256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLockDurationNotification {
    pub duration: BlockDuration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLockMosaicNotification {
    pub mosaic: UnresolvedMosaic,
}

// =============================================================================
// NOTIFICATION ENUM
// =============================================================================

macro_rules! define_notifications {
    ($($variant:ident($payload:ident) => ($channel:ident, $facility:ident, $code:literal)),* $(,)?) => {
        /// Any published notification.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum Notification {
            $($variant($payload),)*
        }

        impl Notification {
            pub fn notification_type(&self) -> NotificationType {
                match self {
                    $(Self::$variant(_) => <$payload as TypedNotification>::NOTIFICATION_TYPE,)*
                }
            }
        }

        $(
            impl TypedNotification for $payload {
                const NOTIFICATION_TYPE: NotificationType = NotificationType::make(
                    NotificationChannel::$channel,
                    facility::$facility,
                    $code,
                );

                #[allow(unreachable_patterns)]
                fn from_notification(notification: &Notification) -> Option<&Self> {
                    match notification {
                        Notification::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$payload> for Notification {
                fn from(payload: $payload) -> Self {
                    Notification::$variant(payload)
                }
            }
        )*
    };
}

define_notifications! {
    AccountAddress(AccountAddressNotification) => (ALL, CORE, 1),
    AccountPublicKey(AccountPublicKeyNotification) => (ALL, CORE, 2),
    BalanceTransfer(BalanceTransferNotification) => (ALL, CORE, 3),
    BalanceDebit(BalanceDebitNotification) => (ALL, CORE, 4),
    Entity(EntityNotification) => (VALIDATOR, CORE, 5),
    Transaction(TransactionNotification) => (ALL, CORE, 6),
    TransactionDeadline(TransactionDeadlineNotification) => (VALIDATOR, CORE, 7),
    TransactionFee(TransactionFeeNotification) => (VALIDATOR, CORE, 8),
    Signer(SignerNotification) => (VALIDATOR, CORE, 9),
    SourceChange(SourceChangeNotification) => (OBSERVER, CORE, 10),
    Block(BlockNotification) => (ALL, CORE, 11),
    Signature(SignatureNotification) => (VALIDATOR, SIGNATURE, 1),
    AggregateCosignatures(AggregateCosignaturesNotification) => (VALIDATOR, AGGREGATE, 1),
    AggregateEmbeddedTransaction(AggregateEmbeddedTransactionNotification) => (VALIDATOR, AGGREGATE, 2),
    ModifyMultisigCosigners(ModifyMultisigCosignersNotification) => (ALL, MULTISIG, 1),
    ModifyMultisigNewCosigner(ModifyMultisigNewCosignerNotification) => (VALIDATOR, MULTISIG, 2),
    ModifyMultisigSettings(ModifyMultisigSettingsNotification) => (ALL, MULTISIG, 3),
    TransferMessage(TransferMessageNotification) => (VALIDATOR, TRANSFER, 1),
    TransferMosaics(TransferMosaicsNotification) => (VALIDATOR, TRANSFER, 2),
    MosaicLevyTransfer(MosaicLevyTransferNotification) => (ALL, MOSAIC, 1),
    HashLock(HashLockNotification) => (ALL, LOCK_HASH, 1),
    HashLockDuration(HashLockDurationNotification) => (VALIDATOR, LOCK_HASH, 2),
    HashLockMosaic(HashLockMosaicNotification) => (VALIDATOR, LOCK_HASH, 3),
}

impl Notification {
    pub fn channel(&self) -> NotificationChannel {
        self.notification_type().channel()
    }

    /// Borrows the payload as `N`.
    pub fn downcast<N: TypedNotification>(&self) -> Option<&N> {
        N::from_notification(self)
    }

    /// Copy with every deferred amount replaced by its resolved value.
    ///
    /// Undo records keep materialized copies because the mempool holding the
    /// deferred descriptors does not outlive the publishing pass.
    pub fn materialize<E>(
        &self,
        mut resolve: impl FnMut(&DeferredAmount) -> Result<Amount, E>,
    ) -> Result<Notification, E> {
        let mut concrete = |amount: &UnresolvedAmount| match amount {
            UnresolvedAmount::Concrete(value) => Ok(UnresolvedAmount::Concrete(*value)),
            UnresolvedAmount::Deferred(deferred) => resolve(deferred).map(UnresolvedAmount::Concrete),
        };

        Ok(match self {
            Self::BalanceTransfer(notification) => Self::BalanceTransfer(BalanceTransferNotification {
                amount: concrete(&notification.amount)?,
                ..notification.clone()
            }),
            Self::BalanceDebit(notification) => Self::BalanceDebit(BalanceDebitNotification {
                amount: concrete(&notification.amount)?,
                ..notification.clone()
            }),
            Self::MosaicLevyTransfer(notification) => {
                Self::MosaicLevyTransfer(MosaicLevyTransferNotification {
                    fee: concrete(&notification.fee)?,
                    ..notification.clone()
                })
            }
            other => other.clone(),
        })
    }
}
