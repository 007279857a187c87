use serde::{Deserialize, Serialize};
use shared_types::{BlockFeeMultiplier, Hash256, Height, Timestamp};

/// Per-block values every transaction of the block is executed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    pub height: Height,
    pub timestamp: Timestamp,
    pub fee_multiplier: BlockFeeMultiplier,
}

/// A block as handed to the executor: header values plus raw transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub height: Height,
    pub timestamp: Timestamp,
    pub fee_multiplier: BlockFeeMultiplier,
    pub transactions: Vec<Vec<u8>>,
}

impl Block {
    pub fn new(height: Height, timestamp: Timestamp, fee_multiplier: BlockFeeMultiplier) -> Self {
        Self {
            height,
            timestamp,
            fee_multiplier,
            transactions: Vec::new(),
        }
    }

    pub fn with_transaction(mut self, bytes: Vec<u8>) -> Self {
        self.transactions.push(bytes);
        self
    }

    pub fn context(&self) -> BlockContext {
        BlockContext {
            height: self.height,
            timestamp: self.timestamp,
            fee_multiplier: self.fee_multiplier,
        }
    }
}

/// Summary published once a block is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedBlock {
    pub height: Height,
    pub state_hash: Hash256,
    pub statement_hash: Hash256,
    pub transaction_hashes: Vec<Hash256>,
    pub receipts_count: usize,
}
