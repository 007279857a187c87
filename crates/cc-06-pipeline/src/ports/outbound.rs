//! Outbound dependencies.

use crate::domain::FinalizedBlock;

/// Receives a summary of every committed block.
///
/// Called on the executing thread after the commit; implementations must
/// not block.
pub trait FinalizationSink: Send + Sync {
    fn finalize(&self, block: &FinalizedBlock);
}
