//! # cc-06-pipeline
//!
//! Executes raw transactions and blocks against the cache.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs   - ChainService: height checks, commit, undo ring  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ uses ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  executor.rs  - TransactionExecutor / BlockExecutor             │
//! │  domain/      - Block, FinalizedBlock, undo records             │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ calls ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/outbound.rs - FinalizationSink                           │
//! │  adapters/         - BroadcastFinalizationSink (tokio)          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A transaction is applied only when every one of its notifications
//! validates; a block is applied only when all of its transactions are.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod executor;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use adapters::BroadcastFinalizationSink;
pub use config::ExecutionConfig;
pub use domain::{Block, BlockContext, BlockUndo, FinalizedBlock, TransactionUndo};
pub use error::{ExecutionError, ExecutionResult};
pub use executor::{BlockExecution, BlockExecutor, PublishedTransaction, TransactionExecutor};
pub use ports::FinalizationSink;
pub use service::ChainService;
