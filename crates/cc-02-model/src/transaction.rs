//! # Transaction Layouts
//!
//! Bounds-checked views over transaction buffers.
//!
//! ```text
//! Top-level header (122 bytes)          Embedded header (42 bytes)
//!   0  size        u32                    0  size     u32
//!   4  signature   [u8; 64]               4  signer   [u8; 32]
//!  68  signer      [u8; 32]              36  version  u32
//! 100  version     u32                   40  type     u16
//! 104  type        u16
//! 106  max_fee     u64
//! 114  deadline    u64
//! ```
//!
//! The first 100 bytes form the verifiable header; everything after it is
//! the signed data buffer.

use crate::errors::DecodeError;
use serde::Serialize;
use shared_types::{
    entity_version_of, network_of, sha3_256, Amount, BinaryReader, BinaryWriter, CodecError,
    EntityType, Hash256, Key, NetworkIdentifier, Signature, Timestamp,
};

pub const VERIFIABLE_ENTITY_HEADER_SIZE: usize = 100;
pub const TRANSACTION_HEADER_SIZE: usize = 122;
pub const EMBEDDED_TRANSACTION_HEADER_SIZE: usize = 42;
pub const COSIGNATURE_SIZE: usize = 96;

// =============================================================================
// TOP-LEVEL TRANSACTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHeader {
    pub size: u32,
    pub signature: Signature,
    pub signer: Key,
    pub version: u32,
    pub entity_type: EntityType,
    pub max_fee: Amount,
    pub deadline: Timestamp,
}

impl TransactionHeader {
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            size: reader.read_u32()?,
            signature: reader.read_signature()?,
            signer: reader.read_key()?,
            version: reader.read_u32()?,
            entity_type: reader.read_entity_type()?,
            max_fee: reader.read_amount()?,
            deadline: reader.read_timestamp()?,
        })
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer
            .write_u32(self.size)
            .write_bytes(self.signature.as_ref())
            .write_bytes(self.signer.as_ref())
            .write_u32(self.version)
            .write_u16(self.entity_type.0)
            .write_u64(self.max_fee.0)
            .write_u64(self.deadline.0);
    }

    pub fn network(&self) -> NetworkIdentifier {
        network_of(self.version)
    }

    pub fn entity_version(&self) -> u32 {
        entity_version_of(self.version)
    }
}

/// A parsed top-level transaction borrowing its buffer.
#[derive(Debug, Clone)]
pub struct Transaction<'a> {
    pub header: TransactionHeader,
    pub payload: &'a [u8],
    bytes: &'a [u8],
}

impl<'a> Transaction<'a> {
    /// Parses the header and checks that the declared size covers the buffer exactly.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        if bytes.len() < TRANSACTION_HEADER_SIZE {
            return Err(DecodeError::TooSmall { size: bytes.len() });
        }

        let mut reader = BinaryReader::new(bytes);
        let header = TransactionHeader::read(&mut reader)?;
        if header.size as usize != bytes.len() {
            return Err(DecodeError::BufferSizeMismatch {
                declared: header.size,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            header,
            payload: reader.read_remaining(),
            bytes,
        })
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Signed part of the buffer: everything after the verifiable header.
    pub fn data_buffer(&self) -> &'a [u8] {
        &self.bytes[VERIFIABLE_ENTITY_HEADER_SIZE..]
    }

    pub fn view(&self) -> TransactionView<'a> {
        TransactionView {
            signer: self.header.signer,
            version: self.header.version,
            entity_type: self.header.entity_type,
            payload: self.payload,
        }
    }
}

/// Hash over signature, signer and `data_buffer`.
pub fn transaction_hash(transaction: &Transaction<'_>, data_buffer: &[u8]) -> Hash256 {
    sha3_256(&[
        transaction.header.signature.as_ref(),
        transaction.header.signer.as_ref(),
        data_buffer,
    ])
}

// =============================================================================
// EMBEDDED TRANSACTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedTransactionHeader {
    pub size: u32,
    pub signer: Key,
    pub version: u32,
    pub entity_type: EntityType,
}

/// An owned transaction embedded in an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedTransaction {
    pub header: EmbeddedTransactionHeader,
    pub payload: Vec<u8>,
}

impl EmbeddedTransaction {
    pub fn new(signer: Key, version: u32, entity_type: EntityType, payload: Vec<u8>) -> Self {
        let size = (EMBEDDED_TRANSACTION_HEADER_SIZE + payload.len()) as u32;
        Self {
            header: EmbeddedTransactionHeader {
                size,
                signer,
                version,
                entity_type,
            },
            payload,
        }
    }

    /// Reads one embedded transaction; its declared size must cover the header.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self, CodecError> {
        let offset = reader.position();
        let size = reader.read_u32()?;
        if (size as usize) < EMBEDDED_TRANSACTION_HEADER_SIZE {
            return Err(CodecError::BufferUnderflow {
                offset,
                needed: EMBEDDED_TRANSACTION_HEADER_SIZE,
                available: size as usize,
            });
        }

        let signer = reader.read_key()?;
        let version = reader.read_u32()?;
        let entity_type = reader.read_entity_type()?;
        let payload = reader.read_bytes(size as usize - EMBEDDED_TRANSACTION_HEADER_SIZE)?;

        Ok(Self {
            header: EmbeddedTransactionHeader {
                size,
                signer,
                version,
                entity_type,
            },
            payload: payload.to_vec(),
        })
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer
            .write_u32(self.header.size)
            .write_bytes(self.header.signer.as_ref())
            .write_u32(self.header.version)
            .write_u16(self.header.entity_type.0)
            .write_bytes(&self.payload);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        self.write(&mut writer);
        writer.into_bytes()
    }

    pub fn network(&self) -> NetworkIdentifier {
        network_of(self.header.version)
    }

    pub fn view(&self) -> TransactionView<'_> {
        TransactionView {
            signer: self.header.signer,
            version: self.header.version,
            entity_type: self.header.entity_type,
            payload: &self.payload,
        }
    }
}

/// Cosignature attached to an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cosignature {
    pub signer: Key,
    pub signature: Signature,
}

impl Cosignature {
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            signer: reader.read_key()?,
            signature: reader.read_signature()?,
        })
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        writer
            .write_bytes(self.signer.as_ref())
            .write_bytes(self.signature.as_ref());
    }
}

/// Fields shared by top-level and embedded transactions.
#[derive(Debug, Clone, Copy)]
pub struct TransactionView<'a> {
    pub signer: Key,
    pub version: u32,
    pub entity_type: EntityType,
    pub payload: &'a [u8],
}

impl TransactionView<'_> {
    pub fn network(&self) -> NetworkIdentifier {
        network_of(self.version)
    }

    pub fn entity_version(&self) -> u32 {
        entity_version_of(self.version)
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Assembles top-level transaction buffers.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    signer: Key,
    version: u32,
    entity_type: EntityType,
    max_fee: Amount,
    deadline: Timestamp,
    payload: Vec<u8>,
}

impl TransactionBuilder {
    pub fn new(entity_type: EntityType, version: u32) -> Self {
        Self {
            signer: Key::zero(),
            version,
            entity_type,
            max_fee: Amount(0),
            deadline: Timestamp(0),
            payload: Vec::new(),
        }
    }

    pub fn signer(mut self, signer: Key) -> Self {
        self.signer = signer;
        self
    }

    pub fn max_fee(mut self, max_fee: Amount) -> Self {
        self.max_fee = max_fee;
        self
    }

    pub fn deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Buffer with a zero signature.
    pub fn build_unsigned(&self) -> Vec<u8> {
        let header = TransactionHeader {
            size: (TRANSACTION_HEADER_SIZE + self.payload.len()) as u32,
            signature: Signature::zero(),
            signer: self.signer,
            version: self.version,
            entity_type: self.entity_type,
            max_fee: self.max_fee,
            deadline: self.deadline,
        };

        let mut writer = BinaryWriter::new();
        header.write(&mut writer);
        writer.write_bytes(&self.payload);
        writer.into_bytes()
    }

    /// Buffer signed by `sign` over the data buffer.
    pub fn sign_with(&self, sign: impl FnOnce(&[u8]) -> Signature) -> Vec<u8> {
        let mut bytes = self.build_unsigned();
        let signature = sign(&bytes[VERIFIABLE_ENTITY_HEADER_SIZE..]);
        bytes[4..4 + Signature::SIZE].copy_from_slice(signature.as_ref());
        bytes
    }
}
