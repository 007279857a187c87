use cc_01_cache::{BalanceError, CacheError};
use cc_02_model::ResolveError;
use shared_types::Address;
use thiserror::Error;

/// Contract violations raised while observing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserverError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Balance error: {0}")]
    Balance(#[from] BalanceError),

    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// A balance change targeted an account that was never added.
    #[error("Account not found: {address}")]
    MissingAccount { address: Address },

    /// Plugin-specific invariant broken by a notification.
    #[error("{observer}: {reason}")]
    Violation { observer: String, reason: String },

    /// A value set aside for rollback could not be encoded or decoded.
    #[error("Undo stash error for {key}: {reason}")]
    Stash { key: String, reason: String },
}
