//! # Receipts
//!
//! Audit records emitted by observers during Commit. Receipts are grouped by
//! source: `primary_id` is the 1-based transaction index in the block and
//! `secondary_id` the 1-based embedded transaction index (0 for top level).

use crate::notifications::{SourceChangeNotification, SourceChangeType};
use serde::Serialize;
use shared_types::{facility, sha3_256, Address, Amount, Hash256, MosaicId};
use std::collections::BTreeMap;
use std::fmt;

/// Basic receipt classification, stored in the top nibble of a receipt type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicReceiptType {
    Other = 0,
    BalanceTransfer = 1,
    BalanceCredit = 2,
    BalanceDebit = 3,
    ArtifactExpiry = 4,
}

/// Packed receipt type: `basic << 12 | code << 8 | facility`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReceiptType(pub u16);

impl ReceiptType {
    pub const fn make(basic: BasicReceiptType, facility: u8, code: u8) -> Self {
        Self((basic as u16) << 12 | ((code & 0x0F) as u16) << 8 | facility as u16)
    }

    pub const LOCK_HASH_CREATED: ReceiptType =
        Self::make(BasicReceiptType::BalanceDebit, facility::LOCK_HASH, 1);
    pub const LOCK_HASH_COMPLETED: ReceiptType =
        Self::make(BasicReceiptType::BalanceCredit, facility::LOCK_HASH, 2);
    pub const LOCK_HASH_EXPIRED: ReceiptType =
        Self::make(BasicReceiptType::BalanceCredit, facility::LOCK_HASH, 3);
    pub const MOSAIC_LEVY: ReceiptType =
        Self::make(BasicReceiptType::BalanceTransfer, facility::MOSAIC, 3);
}

impl fmt::Debug for ReceiptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiptType(0x{:04X})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReceiptBody {
    BalanceChange {
        account: Address,
        mosaic_id: MosaicId,
        amount: Amount,
    },
    BalanceTransfer {
        sender: Address,
        recipient: Address,
        mosaic_id: MosaicId,
        amount: Amount,
    },
    ArtifactExpiry {
        artifact_id: Hash256,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub version: u8,
    pub receipt_type: ReceiptType,
    pub body: ReceiptBody,
}

impl Receipt {
    pub fn new(receipt_type: ReceiptType, body: ReceiptBody) -> Self {
        Self {
            version: 1,
            receipt_type,
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReceiptSource {
    pub primary_id: u32,
    pub secondary_id: u32,
}

/// Collects the receipts of one block.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    source: ReceiptSource,
    receipts: BTreeMap<ReceiptSource, Vec<Receipt>>,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> ReceiptSource {
        self.source
    }

    pub fn set_source(&mut self, source: ReceiptSource) {
        self.source = source;
    }

    /// Relative changes add to the current ids, absolute changes replace them.
    pub fn apply_source_change(&mut self, change: &SourceChangeNotification) {
        fn apply(current: u32, change_type: SourceChangeType, id: u32) -> u32 {
            match change_type {
                SourceChangeType::Absolute => id,
                SourceChangeType::Relative => current.wrapping_add(id),
            }
        }

        self.source = ReceiptSource {
            primary_id: apply(self.source.primary_id, change.primary_change_type, change.primary_id),
            secondary_id: apply(
                self.source.secondary_id,
                change.secondary_change_type,
                change.secondary_id,
            ),
        };
    }

    /// Adds a receipt under the current source.
    pub fn add_receipt(&mut self, receipt: Receipt) {
        self.receipts.entry(self.source).or_default().push(receipt);
    }

    pub fn receipt_count(&self) -> usize {
        self.receipts.values().map(Vec::len).sum()
    }

    pub fn build(self) -> BlockStatement {
        BlockStatement {
            statements: self.receipts,
        }
    }
}

/// Receipts of one block grouped by source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockStatement {
    statements: BTreeMap<ReceiptSource, Vec<Receipt>>,
}

impl BlockStatement {
    pub fn receipts(&self, source: ReceiptSource) -> &[Receipt] {
        self.statements.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ReceiptSource, &Vec<Receipt>)> {
        self.statements.iter()
    }

    /// Total number of receipts.
    pub fn len(&self) -> usize {
        self.statements.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SHA3-256 over the serialized statements.
    pub fn hash(&self) -> Result<Hash256, bincode::Error> {
        let bytes = bincode::serialize(&self.statements)?;
        Ok(sha3_256(&[&bytes]))
    }
}
