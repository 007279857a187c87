use shared_types::{Amount, MosaicId};
use thiserror::Error;

/// Errors raised by the cache and its deltas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// No sub-cache was registered for the requested descriptor.
    #[error("Sub-cache not registered: {name}")]
    UnregisteredSubCache { name: &'static str },

    /// The same descriptor was registered twice.
    #[error("Sub-cache already registered: {name}")]
    DuplicateSubCache { name: &'static str },

    /// `create_delta` was called while another delta is alive.
    #[error("A cache delta is already outstanding")]
    DeltaOutstanding,

    /// The delta was created by a different cache instance.
    #[error("Delta does not belong to this cache")]
    ForeignDelta,

    /// The cache was committed after the delta was created.
    #[error("Delta base is stale: committed height is {committed}, delta base is {base}")]
    StaleDelta { committed: u64, base: u64 },

    /// Insert of a key that is already present.
    #[error("Entry already exists in {cache}: {key}")]
    DuplicateEntry { cache: &'static str, key: String },

    /// Removal or mutation of a key that is absent.
    #[error("Entry not found in {cache}: {key}")]
    MissingEntry { cache: &'static str, key: String },

    /// An entry could not be serialized for hashing.
    #[error("Failed to serialize {cache} entry: {reason}")]
    Serialization { cache: &'static str, reason: String },
}

/// Errors raised by balance arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// Debit larger than the available balance.
    #[error("Insufficient balance of mosaic {mosaic_id}: have {balance}, need {amount}")]
    Insufficient {
        mosaic_id: MosaicId,
        balance: Amount,
        amount: Amount,
    },

    /// Credit would overflow the balance.
    #[error("Balance overflow for mosaic {mosaic_id}")]
    Overflow { mosaic_id: MosaicId },
}
