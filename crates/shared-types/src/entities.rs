//! # Core Value Types
//!
//! Strongly typed wrappers for every scalar and byte-array value that flows
//! through the pipeline. Wrapping keeps heights, amounts and identifiers from
//! being mixed up at compile time.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha3::{Digest, Sha3_256};
use std::fmt;

// =============================================================================
// SCALAR VALUES
// =============================================================================

macro_rules! define_base_value {
    ($(#[$meta:meta])* $name:ident, $inner:ty, $display:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        pub struct $name(pub $inner);

        impl $name {
            /// Wraps a raw value.
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $display, self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

define_base_value!(
    /// Chain height. Height 1 is the nemesis block.
    Height, u64, "{}"
);
define_base_value!(
    /// Network timestamp in milliseconds.
    Timestamp, u64, "{}"
);
define_base_value!(
    /// Quantity of a mosaic in atomic units.
    Amount, u64, "{}"
);
define_base_value!(
    /// Number of blocks.
    BlockDuration, u64, "{}"
);
define_base_value!(
    /// Resolved mosaic identifier.
    MosaicId, u64, "{:016X}"
);
define_base_value!(
    /// Mosaic identifier that may still be a namespace alias.
    UnresolvedMosaicId, u64, "{:016X}"
);
define_base_value!(
    /// Namespace identifier. Namespace ids always have the high bit set.
    NamespaceId, u64, "{:016X}"
);
define_base_value!(
    /// Block-level multiplier applied to transaction sizes to derive fees.
    BlockFeeMultiplier, u32, "{}"
);

const NAMESPACE_FLAG: u64 = 1 << 63;

impl Height {
    /// Adds a block duration, returning `None` on overflow.
    pub fn checked_add(self, duration: BlockDuration) -> Option<Height> {
        self.0.checked_add(duration.0).map(Height)
    }

    /// Previous height, saturating at zero.
    pub fn prev(self) -> Height {
        Height(self.0.saturating_sub(1))
    }
}

impl Amount {
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Timestamp {
    /// Adds a time span, returning `None` on overflow.
    pub fn checked_add(self, span: TimeSpan) -> Option<Timestamp> {
        self.0.checked_add(span.millis()).map(Timestamp)
    }
}

impl MosaicId {
    /// Unresolved form of a resolved id (the identity mapping).
    pub fn to_unresolved(self) -> UnresolvedMosaicId {
        UnresolvedMosaicId(self.0)
    }
}

impl UnresolvedMosaicId {
    /// True when the id refers to a namespace alias rather than a mosaic.
    pub fn is_alias(self) -> bool {
        self.0 & NAMESPACE_FLAG != 0
    }

    /// Namespace id carried by an alias.
    pub fn namespace_id(self) -> Option<NamespaceId> {
        self.is_alias().then_some(NamespaceId(self.0))
    }
}

impl NamespaceId {
    /// Builds a namespace id, forcing the namespace flag.
    pub const fn from_raw(value: u64) -> Self {
        Self(value | NAMESPACE_FLAG)
    }

    /// Mosaic alias form of this namespace.
    pub fn to_unresolved_mosaic_id(self) -> UnresolvedMosaicId {
        UnresolvedMosaicId(self.0)
    }
}

/// A time span with millisecond resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TimeSpan {
    millis: u64,
}

impl TimeSpan {
    pub const fn from_milliseconds(millis: u64) -> Self {
        Self { millis }
    }

    pub const fn from_seconds(seconds: u64) -> Self {
        Self::from_milliseconds(seconds * 1_000)
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self::from_seconds(minutes * 60)
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self::from_minutes(hours * 60)
    }

    pub const fn millis(&self) -> u64 {
        self.millis
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

// =============================================================================
// BYTE ARRAYS
// =============================================================================

macro_rules! define_byte_array {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(#[serde_as(as = "Bytes")] pub [u8; $size]);

        impl $name {
            /// Size in bytes.
            pub const SIZE: usize = $size;

            pub const fn new(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// All-zero value.
            pub const fn zero() -> Self {
                Self([0u8; $size])
            }

            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|byte| *byte == 0)
            }

            /// Parses a hex string of exactly `SIZE` bytes.
            pub fn from_hex(value: &str) -> Option<Self> {
                let bytes = hex::decode(value).ok()?;
                <[u8; $size]>::try_from(bytes.as_slice()).ok().map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode_upper(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode_upper(self.0))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }
    };
}

define_byte_array!(
    /// Ed25519 public key.
    Key, 32
);
define_byte_array!(
    /// SHA3-256 digest.
    Hash256, 32
);
define_byte_array!(
    /// Ed25519 signature.
    Signature, 64
);
define_byte_array!(
    /// Decoded account address: network byte, key digest and checksum.
    Address, 25
);
define_byte_array!(
    /// Address that may still be a namespace alias.
    UnresolvedAddress, 25
);

/// Hashes the concatenation of `parts` with SHA3-256.
pub fn sha3_256(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    Hash256(hasher.finalize().into())
}

// =============================================================================
// NETWORK & ENTITY TYPES
// =============================================================================

/// One-byte network identifier embedded in addresses and entity versions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct NetworkIdentifier(pub u8);

impl NetworkIdentifier {
    pub const ZERO: NetworkIdentifier = NetworkIdentifier(0);
    pub const MIJIN: NetworkIdentifier = NetworkIdentifier(0x60);
    pub const MIJIN_TEST: NetworkIdentifier = NetworkIdentifier(0x90);
    pub const PUBLIC: NetworkIdentifier = NetworkIdentifier(0x68);
    pub const PUBLIC_TEST: NetworkIdentifier = NetworkIdentifier(0x98);
}

impl fmt::Display for NetworkIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Basic classification encoded in the top two bits of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicEntityType {
    Other,
    Transaction,
    Block,
}

/// Two-byte entity type: basic type, code and facility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct EntityType(pub u16);

impl EntityType {
    /// Composes an entity type from its parts.
    pub const fn make(basic: BasicEntityType, facility: u8, code: u8) -> Self {
        let basic_bits = match basic {
            BasicEntityType::Other => 0u16,
            BasicEntityType::Transaction => 1,
            BasicEntityType::Block => 2,
        };
        Self(basic_bits << 14 | ((code & 0x0F) as u16) << 8 | facility as u16)
    }

    pub const TRANSFER: EntityType = Self::make(BasicEntityType::Transaction, 0x54, 1);
    pub const MODIFY_MULTISIG_ACCOUNT: EntityType =
        Self::make(BasicEntityType::Transaction, 0x55, 1);
    pub const AGGREGATE_COMPLETE: EntityType = Self::make(BasicEntityType::Transaction, 0x41, 1);
    pub const AGGREGATE_BONDED: EntityType = Self::make(BasicEntityType::Transaction, 0x41, 2);
    pub const HASH_LOCK: EntityType = Self::make(BasicEntityType::Transaction, 0x48, 1);

    pub fn basic_type(self) -> BasicEntityType {
        match self.0 >> 14 {
            1 => BasicEntityType::Transaction,
            2 => BasicEntityType::Block,
            _ => BasicEntityType::Other,
        }
    }

    pub fn facility(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Packs a network identifier and entity version into a header version field.
pub const fn make_version(network: NetworkIdentifier, entity_version: u32) -> u32 {
    (network.0 as u32) << 24 | (entity_version & 0x00FF_FFFF)
}

/// Network identifier carried by a header version field.
pub const fn network_of(version: u32) -> NetworkIdentifier {
    NetworkIdentifier((version >> 24) as u8)
}

/// Entity version carried by a header version field.
pub const fn entity_version_of(version: u32) -> u32 {
    version & 0x00FF_FFFF
}

// =============================================================================
// MOSAICS
// =============================================================================

/// A resolved mosaic quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mosaic {
    pub mosaic_id: MosaicId,
    pub amount: Amount,
}

/// A mosaic quantity whose id may still be an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnresolvedMosaic {
    pub mosaic_id: UnresolvedMosaicId,
    pub amount: Amount,
}
