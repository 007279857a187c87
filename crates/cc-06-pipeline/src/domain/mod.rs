//! Block inputs, summaries and undo records.

mod block;
mod undo;

pub use block::{Block, BlockContext, FinalizedBlock};
pub use undo::{BlockUndo, TransactionUndo};
