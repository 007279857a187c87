use super::{HashLockInfo, HashLockInfoCacheDescriptor, LockStatus};
use cc_01_cache::BasicCacheDelta;
use cc_02_model::{BlockNotification, HashLockNotification, Receipt, ReceiptBody, ReceiptType, TransactionNotification};
use cc_04_observers::utils::{credit_balance, debit_balance, expiry_height, should_prune};
use cc_04_observers::{NotificationObserver, NotifyMode, ObserverContext, ObserverError};
use shared_types::{EntityType, Hash256, Height};
use tracing::debug;

fn locks_mut<'c>(
    context: &'c mut ObserverContext<'_>,
) -> Result<&'c mut BasicCacheDelta<HashLockInfoCacheDescriptor>, ObserverError> {
    Ok(context.cache.try_sub_mut::<HashLockInfoCacheDescriptor>()?)
}

/// Moves a lock from `from` to `to`, returning the updated lock.
fn transition(
    context: &mut ObserverContext<'_>,
    observer: &str,
    hash: &Hash256,
    from: LockStatus,
    to: LockStatus,
) -> Result<HashLockInfo, ObserverError> {
    let lock = locks_mut(context)?
        .find_mut(hash)
        .ok_or_else(|| ObserverError::Violation {
            observer: observer.to_string(),
            reason: format!("no lock for hash {hash}"),
        })?;

    if lock.status != from {
        return Err(ObserverError::Violation {
            observer: observer.to_string(),
            reason: format!("lock {hash} is {:?}, expected {:?}", lock.status, from),
        });
    }

    lock.status = to;
    Ok(lock.clone())
}

/// Releases `lock` to its owner on commit, reclaims it on rollback.
fn release(context: &mut ObserverContext<'_>, lock: &HashLockInfo, receipt_type: ReceiptType) -> Result<(), ObserverError> {
    let owner = context.address_of(&lock.owner);
    match context.mode {
        NotifyMode::Commit => {
            credit_balance(context, owner, lock.mosaic_id, lock.amount)?;
            context.add_receipt(Receipt::new(
                receipt_type,
                ReceiptBody::BalanceChange {
                    account: owner,
                    mosaic_id: lock.mosaic_id,
                    amount: lock.amount,
                },
            ));
            Ok(())
        }
        NotifyMode::Rollback => debit_balance(context, owner, lock.mosaic_id, lock.amount),
    }
}

// =============================================================================
// CREATION
// =============================================================================

/// Records a new lock and takes its funds from the owner.
#[derive(Debug, Clone, Default)]
pub struct HashLockObserver;

impl NotificationObserver<HashLockNotification> for HashLockObserver {
    fn name(&self) -> &str {
        "HashLockObserver"
    }

    fn notify(&self, notification: &HashLockNotification, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        let owner = context.address_of(&notification.signer);
        let mosaic_id = context.resolve_mosaic_id(notification.mosaic.mosaic_id);
        let amount = notification.mosaic.amount;

        match context.mode {
            NotifyMode::Commit => {
                let lock = HashLockInfo {
                    hash: notification.hash,
                    owner: notification.signer,
                    mosaic_id,
                    amount,
                    end_height: expiry_height(context.height, notification.duration),
                    status: LockStatus::Unused,
                };
                debug!("[HashLock] locking {} until height {}", lock.hash, lock.end_height);
                locks_mut(context)?.insert(lock)?;

                debit_balance(context, owner, mosaic_id, amount)?;
                context.add_receipt(Receipt::new(
                    ReceiptType::LOCK_HASH_CREATED,
                    ReceiptBody::BalanceChange {
                        account: owner,
                        mosaic_id,
                        amount,
                    },
                ));
            }
            NotifyMode::Rollback => {
                locks_mut(context)?.remove(&notification.hash)?;
                credit_balance(context, owner, mosaic_id, amount)?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// COMPLETION
// =============================================================================

/// Returns locked funds once the bonded aggregate they guard is confirmed.
#[derive(Debug, Clone, Default)]
pub struct CompletedAggregateObserver;

impl NotificationObserver<TransactionNotification> for CompletedAggregateObserver {
    fn name(&self) -> &str {
        "CompletedAggregateObserver"
    }

    fn notify(
        &self,
        notification: &TransactionNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        if notification.transaction_type != EntityType::AGGREGATE_BONDED {
            return Ok(());
        }

        let (from, to) = match context.mode {
            NotifyMode::Commit => (LockStatus::Unused, LockStatus::Used),
            NotifyMode::Rollback => (LockStatus::Used, LockStatus::Unused),
        };
        let lock = transition(context, self.name(), &notification.transaction_hash, from, to)?;
        release(context, &lock, ReceiptType::LOCK_HASH_COMPLETED)
    }
}

// =============================================================================
// EXPIRY
// =============================================================================

/// Returns the funds of locks that reach their end height unused.
#[derive(Debug, Clone, Default)]
pub struct ExpiredHashLockInfoObserver;

impl NotificationObserver<BlockNotification> for ExpiredHashLockInfoObserver {
    fn name(&self) -> &str {
        "ExpiredHashLockInfoObserver"
    }

    fn notify(&self, _notification: &BlockNotification, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        let height = context.height;
        let (from, to) = match context.mode {
            NotifyMode::Commit => (LockStatus::Unused, LockStatus::Expired),
            NotifyMode::Rollback => (LockStatus::Expired, LockStatus::Unused),
        };

        let expiring: Vec<Hash256> = locks_mut(context)?
            .iter()
            .filter(|(_, lock)| lock.end_height == height && lock.status == from)
            .map(|(hash, _)| *hash)
            .collect();

        for hash in &expiring {
            let lock = transition(context, self.name(), hash, from, to)?;
            release(context, &lock, ReceiptType::LOCK_HASH_EXPIRED)?;
        }

        if !expiring.is_empty() {
            debug!("[HashLock] {} locks expired at height {}", expiring.len(), height);
        }

        Ok(())
    }
}

/// Removes settled locks once they fall out of the rollback window.
///
/// Runs every `interval` blocks on locks that ended more than `interval`
/// blocks ago and are no longer unused. Removed locks are stashed with the
/// block undo record and reinserted when that block is rolled back.
#[derive(Debug, Clone)]
pub struct HashLockPruningObserver {
    interval: u64,
}

impl HashLockPruningObserver {
    pub fn new(interval: u64) -> Self {
        Self { interval }
    }

    fn prune(&self, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        let Some(cutoff) = context.height.0.checked_sub(self.interval) else {
            return Ok(());
        };
        let cutoff = Height(cutoff);

        let locks = locks_mut(context)?;
        let pruned: Vec<HashLockInfo> = locks
            .iter()
            .filter(|(_, lock)| lock.end_height < cutoff && lock.status != LockStatus::Unused)
            .map(|(_, lock)| lock.clone())
            .collect();

        for lock in &pruned {
            locks.remove(&lock.hash)?;
        }

        debug!("[HashLock] pruned {} locks at height {}", pruned.len(), context.height);
        if !pruned.is_empty() {
            context.stash(self.name(), &pruned)?;
        }
        Ok(())
    }

    fn restore(&self, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        let pruned: Vec<HashLockInfo> = context.unstash(self.name())?.unwrap_or_default();
        if pruned.is_empty() {
            return Ok(());
        }

        let locks = locks_mut(context)?;
        let restored = pruned.len();
        for lock in pruned {
            locks.insert(lock)?;
        }

        debug!("[HashLock] restored {} pruned locks at height {}", restored, context.height);
        Ok(())
    }
}

impl NotificationObserver<BlockNotification> for HashLockPruningObserver {
    fn name(&self) -> &str {
        "HashLockPruningObserver"
    }

    fn notify(&self, _notification: &BlockNotification, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        if !should_prune(context, self.interval) {
            return Ok(());
        }

        match context.mode {
            NotifyMode::Commit => self.prune(context),
            NotifyMode::Rollback => self.restore(context),
        }
    }
}
