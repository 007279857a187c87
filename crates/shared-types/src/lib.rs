//! # Shared Types Crate
//!
//! Value types shared by every layer of the transaction-processing core.
//!
//! ## Contents
//!
//! - **Entities**: heights, amounts, mosaic ids, keys, hashes, entity types.
//! - **Addresses**: decoded 25-byte addresses with checksum and alias forms.
//! - **Results**: packed `(severity, facility, code)` validation results.
//! - **Codec**: bounds-checked little-endian reader and writer.
//! - **Config**: the generic key/value configuration bag and its parsers.

pub mod address;
pub mod codec;
pub mod config;
pub mod entities;
pub mod errors;
pub mod results;

pub use address::*;
pub use codec::{BinaryReader, BinaryWriter};
pub use config::{ConfigSectionReader, ConfigValue, ConfigurationBag};
pub use entities::*;
pub use errors::*;
pub use results::*;
