//! Error types for transaction and block execution.

use cc_01_cache::CacheError;
use cc_02_model::{DecodeError, ResolveError};
use cc_04_observers::ObserverError;
use cc_05_plugins::PluginError;
use shared_types::{Hash256, Height, ValidationResult};
use thiserror::Error;

/// Reasons a transaction or block could not be executed.
///
/// Any error aborts the block; the caller discards the delta.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Malformed bytes, unknown type or a declared size that does not match.
    #[error("Transaction {index} could not be decoded: {source}")]
    Decode {
        index: usize,
        #[source]
        source: DecodeError,
    },

    /// A validator returned a failure.
    #[error("Transaction {index} ({hash}) rejected: {result}")]
    Rejected {
        index: usize,
        hash: Hash256,
        result: ValidationResult,
    },

    /// The block notification itself failed validation.
    #[error("Block at height {height} rejected: {result}")]
    BlockRejected { height: Height, result: ValidationResult },

    #[error("Observer error: {0}")]
    Observer(#[from] ObserverError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Block height {actual} does not follow chain height {expected}")]
    HeightMismatch { expected: Height, actual: Height },

    #[error("No undo record available")]
    NothingToUndo,

    #[error("Statement could not be hashed: {0}")]
    Statement(String),
}

impl ExecutionError {
    /// Attaches the position of the offending transaction.
    pub(crate) fn decode(index: usize, source: DecodeError) -> Self {
        Self::Decode { index, source }
    }
}

/// Result type for execution operations
pub type ExecutionResult<T> = Result<T, ExecutionError>;
