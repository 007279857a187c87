use cc_02_model::Notification;
use cc_04_observers::UndoStash;
use shared_types::{EntityType, Hash256, Height};

/// Everything needed to roll back one transaction.
///
/// Notifications are materialized: deferred amounts hold the values the
/// observers applied on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionUndo {
    pub hash: Hash256,
    pub entity_type: EntityType,
    pub notifications: Vec<Notification>,
}

/// Undo records of one block in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockUndo {
    pub height: Height,
    pub transactions: Vec<TransactionUndo>,
    /// Notifications observed after the last transaction.
    pub block_notifications: Vec<Notification>,
    /// State the observers removed on commit and restore on rollback.
    pub stash: UndoStash,
}

impl BlockUndo {
    pub fn transaction_hashes(&self) -> Vec<Hash256> {
        self.transactions.iter().map(|undo| undo.hash).collect()
    }

    pub fn notifications_count(&self) -> usize {
        self.block_notifications.len()
            + self
                .transactions
                .iter()
                .map(|undo| undo.notifications.len())
                .sum::<usize>()
    }
}
