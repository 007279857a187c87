//! Transfer transaction layout and notifications.
//!
//! ```text
//!  0  recipient      [u8; 25]  (unresolved)
//! 25  message_size   u16
//! 27  mosaics_count  u8
//! 28  message        [u8; message_size]
//!  …  mosaics        mosaics_count × (id u64, amount u64)
//! ```

use cc_02_model::{
    AccountAddressNotification, BalanceTransferNotification, DeferredAmountDescriptor,
    MosaicLevyTransferNotification, NotificationSubscriber, TransactionBody,
    TransferMessageNotification, TransferMosaicsNotification, TransactionView, UnresolvedAmount,
};
use shared_types::{
    BinaryReader, BinaryWriter, CodecError, EntityType, UnresolvedAddress, UnresolvedMosaic,
};

const FIXED_PAYLOAD_SIZE: u64 = 25 + 2 + 1;
const MOSAIC_SIZE: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTransaction {
    pub recipient: UnresolvedAddress,
    pub message: Vec<u8>,
    pub mosaics: Vec<UnresolvedMosaic>,
}

impl TransferTransaction {
    pub fn parse(payload: &[u8]) -> Result<Self, CodecError> {
        let mut reader = BinaryReader::new(payload);
        let recipient = reader.read_unresolved_address()?;
        let message_size = reader.read_u16()?;
        let mosaics_count = reader.read_u8()?;
        let message = reader.read_bytes(usize::from(message_size))?.to_vec();

        let mut mosaics = Vec::with_capacity(usize::from(mosaics_count));
        for _ in 0..mosaics_count {
            mosaics.push(UnresolvedMosaic {
                mosaic_id: reader.read_unresolved_mosaic_id()?,
                amount: reader.read_amount()?,
            });
        }

        Ok(Self {
            recipient,
            message,
            mosaics,
        })
    }

    /// Serialized payload; message and mosaic lists must fit their count fields.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        writer
            .write_bytes(self.recipient.as_ref())
            .write_u16(self.message.len() as u16)
            .write_u8(self.mosaics.len() as u8)
            .write_bytes(&self.message);
        for mosaic in &self.mosaics {
            writer.write_u64(mosaic.mosaic_id.0).write_u64(mosaic.amount.0);
        }
        writer.into_bytes()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransferTransactionBody;

impl TransactionBody for TransferTransactionBody {
    const ENTITY_TYPE: EntityType = EntityType::TRANSFER;

    fn payload_size(&self, payload: &[u8]) -> Option<u64> {
        let mut reader = BinaryReader::new(payload);
        reader.read_bytes(25).ok()?;
        let message_size = u64::from(reader.read_u16().ok()?);
        let mosaics_count = u64::from(reader.read_u8().ok()?);
        Some(FIXED_PAYLOAD_SIZE + message_size + mosaics_count * MOSAIC_SIZE)
    }

    fn publish(
        &self,
        transaction: &TransactionView<'_>,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError> {
        let transfer = TransferTransaction::parse(transaction.payload)?;
        let sender = transaction.signer;

        sub.notify(
            AccountAddressNotification {
                address: transfer.recipient,
            }
            .into(),
        );

        for mosaic in &transfer.mosaics {
            sub.notify(
                BalanceTransferNotification {
                    sender,
                    recipient: transfer.recipient,
                    mosaic_id: mosaic.mosaic_id,
                    amount: UnresolvedAmount::Concrete(mosaic.amount),
                }
                .into(),
            );

            let fee = UnresolvedAmount::defer(
                sub.mempool(),
                DeferredAmountDescriptor::MosaicLevy {
                    mosaic_id: mosaic.mosaic_id,
                    transfer_amount: mosaic.amount,
                },
            );
            sub.notify(
                MosaicLevyTransferNotification {
                    sender,
                    mosaic_id: mosaic.mosaic_id,
                    fee,
                }
                .into(),
            );
        }

        if !transfer.message.is_empty() {
            sub.notify(
                TransferMessageNotification {
                    message_size: transfer.message.len() as u16,
                }
                .into(),
            );
        }

        if !transfer.mosaics.is_empty() {
            sub.notify(
                TransferMosaicsNotification {
                    mosaics: transfer.mosaics,
                }
                .into(),
            );
        }

        Ok(())
    }
}
