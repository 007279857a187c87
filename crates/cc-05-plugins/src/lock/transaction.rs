//! Hash lock transaction.
//!
//! ```text
//! 0   mosaic_id   u64
//! 8   amount      u64
//! 16  duration    u64
//! 24  hash        [u8; 32]
//! ```

use cc_02_model::{
    HashLockDurationNotification, HashLockMosaicNotification, HashLockNotification, NotificationSubscriber,
    TransactionBody, TransactionView,
};
use shared_types::{BinaryReader, BinaryWriter, BlockDuration, CodecError, EntityType, Hash256, UnresolvedMosaic};

const PAYLOAD_SIZE: u64 = 8 + 8 + 8 + 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLockTransaction {
    pub mosaic: UnresolvedMosaic,
    pub duration: BlockDuration,
    /// Hash of the bonded aggregate the funds are locked for.
    pub hash: Hash256,
}

impl HashLockTransaction {
    pub fn parse(payload: &[u8]) -> Result<Self, CodecError> {
        let mut reader = BinaryReader::new(payload);
        Ok(Self {
            mosaic: UnresolvedMosaic {
                mosaic_id: reader.read_unresolved_mosaic_id()?,
                amount: reader.read_amount()?,
            },
            duration: reader.read_block_duration()?,
            hash: reader.read_hash()?,
        })
    }

    pub fn to_payload(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        writer
            .write_u64(self.mosaic.mosaic_id.0)
            .write_u64(self.mosaic.amount.0)
            .write_u64(self.duration.0)
            .write_bytes(self.hash.as_ref());
        writer.into_bytes()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashLockTransactionBody;

impl TransactionBody for HashLockTransactionBody {
    const ENTITY_TYPE: EntityType = EntityType::HASH_LOCK;

    fn payload_size(&self, _payload: &[u8]) -> Option<u64> {
        Some(PAYLOAD_SIZE)
    }

    fn publish(
        &self,
        transaction: &TransactionView<'_>,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError> {
        let lock = HashLockTransaction::parse(transaction.payload)?;

        sub.notify(HashLockDurationNotification { duration: lock.duration }.into());
        sub.notify(HashLockMosaicNotification { mosaic: lock.mosaic }.into());
        sub.notify(
            HashLockNotification {
                signer: transaction.signer,
                mosaic: lock.mosaic,
                duration: lock.duration,
                hash: lock.hash,
            }
            .into(),
        );

        Ok(())
    }
}
