//! Aggregate transaction plugin.
//!
//! ```text
//! 0    payload_size    u32
//! 4    transactions    payload_size bytes of embedded transactions
//! ..   cosignatures    n × (signer [u8; 32], signature [u8; 64])
//! ```
//!
//! The signed data buffer stops before the cosignatures, so cosigners sign
//! the aggregate hash and new cosignatures never change it.

use cc_02_model::{
    AccountPublicKeyNotification, AggregateCosignaturesNotification, AggregateEmbeddedTransactionNotification,
    Cosignature, EmbeddedTransaction, EmbeddedTransactionInfo, EmbeddedTransactionPlugin, EntityNotification,
    NotificationSubscriber, SignatureNotification, SourceChangeNotification, SourceChangeType, Transaction,
    TransactionAttributes, TransactionInfo, TransactionPlugin, TransactionRegistry, COSIGNATURE_SIZE,
    TRANSACTION_HEADER_SIZE, VERIFIABLE_ENTITY_HEADER_SIZE,
};
use shared_types::{entity_version_of, BinaryReader, BinaryWriter, CodecError, EntityType, Height, TimeSpan};
use std::sync::Arc;
use tracing::debug;

const PAYLOAD_SIZE_FIELD: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateTransaction {
    pub transactions: Vec<EmbeddedTransaction>,
    pub cosignatures: Vec<Cosignature>,
}

impl AggregateTransaction {
    pub fn parse(payload: &[u8]) -> Result<Self, CodecError> {
        let mut reader = BinaryReader::new(payload);
        let payload_size = reader.read_u32()? as usize;

        let mut transactions_reader = reader.sub_reader(payload_size)?;
        let mut transactions = Vec::new();
        while transactions_reader.remaining() > 0 {
            transactions.push(EmbeddedTransaction::read(&mut transactions_reader)?);
        }

        if reader.remaining() % COSIGNATURE_SIZE != 0 {
            return Err(CodecError::InvalidValue {
                field: "cosignatures size",
                value: reader.remaining() as u64,
            });
        }

        let mut cosignatures = Vec::with_capacity(reader.remaining() / COSIGNATURE_SIZE);
        while reader.remaining() > 0 {
            cosignatures.push(Cosignature::read(&mut reader)?);
        }

        Ok(Self {
            transactions,
            cosignatures,
        })
    }

    pub fn to_payload(&self) -> Vec<u8> {
        let mut transactions = BinaryWriter::new();
        for transaction in &self.transactions {
            transaction.write(&mut transactions);
        }
        let transactions = transactions.into_bytes();

        let mut writer = BinaryWriter::new();
        writer
            .write_u32(transactions.len() as u32)
            .write_bytes(&transactions);
        for cosignature in &self.cosignatures {
            cosignature.write(&mut writer);
        }
        writer.into_bytes()
    }
}

/// Plugin for one aggregate flavour (complete or bonded).
pub struct AggregateTransactionPlugin {
    entity_type: EntityType,
    max_lifetime: TimeSpan,
}

impl AggregateTransactionPlugin {
    pub const MIN_VERSION: u32 = 1;
    pub const MAX_VERSION: u32 = 1;

    pub fn new(entity_type: EntityType, max_lifetime: TimeSpan) -> Self {
        Self {
            entity_type,
            max_lifetime,
        }
    }

    fn payload_size(payload: &[u8]) -> Option<usize> {
        let bytes = payload.get(..PAYLOAD_SIZE_FIELD)?;
        let size = u32::from_le_bytes(bytes.try_into().ok()?) as usize;
        (PAYLOAD_SIZE_FIELD + size <= payload.len()).then_some(size)
    }

    /// True when every embedded transaction is known, embeddable and sized consistently.
    fn embedded_sizes_match(transactions: &[u8], registry: &TransactionRegistry) -> bool {
        let mut reader = BinaryReader::new(transactions);
        while reader.remaining() > 0 {
            let Ok(transaction) = EmbeddedTransaction::read(&mut reader) else {
                return false;
            };

            let Some(plugin) = registry.find_embedded(transaction.header.entity_type) else {
                debug!(
                    "[Aggregate] embedded type {} is not embeddable",
                    transaction.header.entity_type
                );
                return false;
            };

            if plugin.calculate_real_size(&transaction) != u64::from(transaction.header.size) {
                return false;
            }
        }

        true
    }
}

impl TransactionPlugin for AggregateTransactionPlugin {
    fn transaction_type(&self) -> EntityType {
        self.entity_type
    }

    fn attributes(&self, _height: Height) -> TransactionAttributes {
        TransactionAttributes {
            min_version: Self::MIN_VERSION,
            max_version: Self::MAX_VERSION,
            max_lifetime: self.max_lifetime,
        }
    }

    fn calculate_real_size(&self, transaction: &Transaction<'_>, registry: &TransactionRegistry) -> u64 {
        let payload = transaction.payload;
        let Some(payload_size) = Self::payload_size(payload) else {
            return u64::MAX;
        };

        let transactions_end = PAYLOAD_SIZE_FIELD + payload_size;
        let cosignatures_size = payload.len() - transactions_end;
        if cosignatures_size % COSIGNATURE_SIZE != 0 {
            return u64::MAX;
        }

        if !Self::embedded_sizes_match(&payload[PAYLOAD_SIZE_FIELD..transactions_end], registry) {
            return u64::MAX;
        }

        (TRANSACTION_HEADER_SIZE + transactions_end + cosignatures_size) as u64
    }

    fn data_buffer<'t>(&self, transaction: &Transaction<'t>) -> &'t [u8] {
        let bytes = transaction.bytes();
        Self::payload_size(transaction.payload)
            .and_then(|payload_size| {
                bytes.get(VERIFIABLE_ENTITY_HEADER_SIZE..TRANSACTION_HEADER_SIZE + PAYLOAD_SIZE_FIELD + payload_size)
            })
            .unwrap_or_else(|| transaction.data_buffer())
    }

    fn publish(
        &self,
        info: &TransactionInfo<'_>,
        registry: &TransactionRegistry,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError> {
        let header = &info.transaction.header;
        let version = entity_version_of(header.version);
        if !self.attributes(info.associated_height).supports(version) {
            debug!(
                "[Aggregate] Skipping {} with unsupported version {}",
                self.entity_type, version
            );
            return Ok(());
        }

        let aggregate = AggregateTransaction::parse(info.transaction.payload)?;
        let transactions: Arc<[EmbeddedTransaction]> = aggregate.transactions.into();
        let cosignatures: Arc<[Cosignature]> = aggregate.cosignatures.into();

        sub.notify(
            AggregateCosignaturesNotification {
                signer: header.signer,
                transactions: Arc::clone(&transactions),
                cosignatures: Arc::clone(&cosignatures),
            }
            .into(),
        );

        for transaction in transactions.iter() {
            let embedded_type = transaction.header.entity_type;
            let plugin = registry
                .find_embedded(embedded_type)
                .ok_or(CodecError::InvalidValue {
                    field: "embedded transaction type",
                    value: u64::from(embedded_type.0),
                })?;

            sub.notify(
                SourceChangeNotification {
                    primary_change_type: SourceChangeType::Relative,
                    primary_id: 0,
                    secondary_change_type: SourceChangeType::Relative,
                    secondary_id: 1,
                }
                .into(),
            );
            sub.notify(
                AccountPublicKeyNotification {
                    public_key: transaction.header.signer,
                }
                .into(),
            );
            sub.notify(
                EntityNotification {
                    network: transaction.network(),
                    entity_type: embedded_type,
                    entity_version: entity_version_of(transaction.header.version),
                }
                .into(),
            );
            sub.notify(
                AggregateEmbeddedTransactionNotification {
                    signer: header.signer,
                    transaction: transaction.clone(),
                    cosignatures: Arc::clone(&cosignatures),
                }
                .into(),
            );

            plugin.publish(
                &EmbeddedTransactionInfo {
                    transaction,
                    associated_height: info.associated_height,
                },
                sub,
            )?;
        }

        let hash: Arc<[u8]> = Arc::from(info.hash.as_ref());
        for cosignature in cosignatures.iter() {
            sub.notify(
                SignatureNotification {
                    signer: cosignature.signer,
                    signature: cosignature.signature,
                    data: Arc::clone(&hash),
                }
                .into(),
            );
        }

        Ok(())
    }
}
