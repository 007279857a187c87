//! # Addresses
//!
//! Decoded address layout (25 bytes):
//!
//! | bytes | content |
//! |-------|---------|
//! | 0 | network identifier |
//! | 1..21 | key digest |
//! | 21..25 | checksum: first four bytes of SHA3-256 over bytes 0..21 |
//!
//! An unresolved address whose first byte has the low bit set is an alias:
//! bytes 1..9 carry a little-endian namespace id.

use crate::entities::{sha3_256, Address, Key, NamespaceId, NetworkIdentifier, UnresolvedAddress};

/// Size of a decoded address.
pub const ADDRESS_DECODED_SIZE: usize = 25;

/// Size of the key digest inside an address.
pub const ADDRESS_DIGEST_SIZE: usize = 20;

/// Size of the trailing checksum.
pub const ADDRESS_CHECKSUM_SIZE: usize = 4;

const CHECKSUM_OFFSET: usize = 1 + ADDRESS_DIGEST_SIZE;
const ALIAS_FLAG: u8 = 0x01;

/// Derives the address of `public_key` on `network`.
pub fn public_key_to_address(public_key: &Key, network: NetworkIdentifier) -> Address {
    let inner = sha3_256(&[public_key.as_ref()]);
    let digest = sha3_256(&[inner.as_ref()]);

    let mut bytes = [0u8; ADDRESS_DECODED_SIZE];
    bytes[0] = network.0;
    bytes[1..CHECKSUM_OFFSET].copy_from_slice(&digest.0[32 - ADDRESS_DIGEST_SIZE..]);

    let checksum = sha3_256(&[&bytes[..CHECKSUM_OFFSET]]);
    bytes[CHECKSUM_OFFSET..].copy_from_slice(&checksum.0[..ADDRESS_CHECKSUM_SIZE]);
    Address(bytes)
}

/// Checks the network byte and checksum of `address`.
pub fn is_valid_address(address: &Address, network: NetworkIdentifier) -> bool {
    if address.0[0] != network.0 {
        return false;
    }

    let checksum = sha3_256(&[&address.0[..CHECKSUM_OFFSET]]);
    address.0[CHECKSUM_OFFSET..] == checksum.0[..ADDRESS_CHECKSUM_SIZE]
}

impl Address {
    /// Network identifier encoded in the first byte.
    pub fn network(&self) -> NetworkIdentifier {
        NetworkIdentifier(self.0[0])
    }

    /// Unresolved form of a resolved address (the identity mapping).
    pub fn to_unresolved(&self) -> UnresolvedAddress {
        UnresolvedAddress(self.0)
    }
}

impl UnresolvedAddress {
    /// Builds an alias address referring to `namespace_id`.
    pub fn from_namespace(namespace_id: NamespaceId, network: NetworkIdentifier) -> Self {
        let mut bytes = [0u8; ADDRESS_DECODED_SIZE];
        bytes[0] = network.0 | ALIAS_FLAG;
        bytes[1..9].copy_from_slice(&namespace_id.0.to_le_bytes());
        Self(bytes)
    }

    pub fn is_alias(&self) -> bool {
        self.0[0] & ALIAS_FLAG != 0
    }

    /// Namespace id carried by an alias address.
    pub fn namespace_id(&self) -> Option<NamespaceId> {
        if !self.is_alias() {
            return None;
        }

        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.0[1..9]);
        Some(NamespaceId(u64::from_le_bytes(raw)))
    }

    /// Resolved address when this is not an alias.
    pub fn to_resolved(&self) -> Option<Address> {
        (!self.is_alias()).then_some(Address(self.0))
    }
}
