//! # Binary Codec
//!
//! Little-endian, bounds-checked access to entity buffers. Every read either
//! returns a validated value or a [`CodecError`]; nothing indexes past the
//! end of the buffer.

use crate::entities::{
    Address, Amount, BlockDuration, EntityType, Hash256, Key, Signature, Timestamp,
    UnresolvedAddress, UnresolvedMosaicId,
};
use crate::errors::CodecError;

/// Sequential reader over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads `count` bytes as a slice of the underlying buffer.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        if count > self.remaining() {
            return Err(CodecError::BufferUnderflow {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }

        let slice = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    /// Reads a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Splits off a reader over the next `count` bytes.
    pub fn sub_reader(&mut self, count: usize) -> Result<BinaryReader<'a>, CodecError> {
        self.read_bytes(count).map(BinaryReader::new)
    }

    /// Reads all remaining bytes.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let slice = &self.buffer[self.position..];
        self.position = self.buffer.len();
        slice
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, CodecError> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads a `u32` length field and converts it to `usize`.
    pub fn read_length(&mut self) -> Result<usize, CodecError> {
        let offset = self.position;
        let length = self.read_u32()?;
        usize::try_from(length).map_err(|_| CodecError::LengthOverflow { offset })
    }

    pub fn read_key(&mut self) -> Result<Key, CodecError> {
        self.read_array().map(Key)
    }

    pub fn read_hash(&mut self) -> Result<Hash256, CodecError> {
        self.read_array().map(Hash256)
    }

    pub fn read_signature(&mut self) -> Result<Signature, CodecError> {
        self.read_array().map(Signature)
    }

    pub fn read_address(&mut self) -> Result<Address, CodecError> {
        self.read_array().map(Address)
    }

    pub fn read_unresolved_address(&mut self) -> Result<UnresolvedAddress, CodecError> {
        self.read_array().map(UnresolvedAddress)
    }

    pub fn read_amount(&mut self) -> Result<Amount, CodecError> {
        self.read_u64().map(Amount)
    }

    pub fn read_unresolved_mosaic_id(&mut self) -> Result<UnresolvedMosaicId, CodecError> {
        self.read_u64().map(UnresolvedMosaicId)
    }

    pub fn read_block_duration(&mut self) -> Result<BlockDuration, CodecError> {
        self.read_u64().map(BlockDuration)
    }

    pub fn read_timestamp(&mut self) -> Result<Timestamp, CodecError> {
        self.read_u64().map(Timestamp)
    }

    pub fn read_entity_type(&mut self) -> Result<EntityType, CodecError> {
        self.read_u16().map(EntityType)
    }
}

/// Little-endian writer used to build entity buffers.
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.write_bytes(&[value])
    }

    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Overwrites four bytes at `offset` with `value`.
    pub fn patch_u32(&mut self, offset: usize, value: u32) -> Result<(), CodecError> {
        let available = self.buffer.len().saturating_sub(offset);
        match self.buffer.get_mut(offset..offset + 4) {
            Some(slot) => {
                slot.copy_from_slice(&value.to_le_bytes());
                Ok(())
            }
            None => Err(CodecError::BufferUnderflow {
                offset,
                needed: 4,
                available,
            }),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
