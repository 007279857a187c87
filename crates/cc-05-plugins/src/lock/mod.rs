//! # Hash Lock Plugin
//!
//! Locks a fixed amount of the currency mosaic against the hash of a bonded
//! aggregate. The lock is released to its owner when the aggregate is
//! confirmed, or when it expires at `end_height` without being used.
//!
//! ```text
//!   HashLock tx ──► Unused ──(bonded aggregate confirmed)──► Used
//!                     │
//!                     └──(height reaches end_height)──────► Expired
//! ```

mod observers;
mod transaction;
mod validators;

pub use observers::*;
pub use transaction::{HashLockTransaction, HashLockTransactionBody};
pub use validators::*;

use crate::errors::PluginError;
use crate::manager::PluginManager;
use cc_01_cache::CacheDescriptor;
use cc_02_model::{PluginConfiguration, TransactionPluginFactory, TransactionPluginFactoryOptions};
use serde::{Deserialize, Serialize};
use shared_types::{
    Amount, BlockDuration, ConfigError, ConfigSectionReader, Hash256, Height, Key, MosaicId,
};

/// `[plugin:lockhash]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashLockConfiguration {
    pub locked_funds_per_aggregate: Amount,
    pub max_hash_lock_duration: BlockDuration,
}

impl PluginConfiguration for HashLockConfiguration {
    const SECTION: &'static str = "plugin:lockhash";

    fn load(reader: &mut ConfigSectionReader<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            locked_funds_per_aggregate: reader.get("lockedFundsPerAggregate")?,
            max_hash_lock_duration: reader.get("maxHashLockDuration")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStatus {
    Unused,
    Used,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashLockInfo {
    pub hash: Hash256,
    pub owner: Key,
    pub mosaic_id: MosaicId,
    pub amount: Amount,
    pub end_height: Height,
    pub status: LockStatus,
}

impl HashLockInfo {
    /// Unused and not yet expired at `height`.
    pub fn is_active(&self, height: Height) -> bool {
        self.status == LockStatus::Unused && height < self.end_height
    }
}

pub struct HashLockInfoCacheDescriptor;

impl CacheDescriptor for HashLockInfoCacheDescriptor {
    const NAME: &'static str = "HashLockInfoCache";
    type Key = Hash256;
    type Value = HashLockInfo;

    fn key_of(value: &HashLockInfo) -> Hash256 {
        value.hash
    }
}

pub fn register_lock_hash_subsystem(manager: &mut PluginManager) -> Result<(), PluginError> {
    let config = manager.config().plugin_config::<HashLockConfiguration>()?;
    let prune_interval = u64::from(manager.config().max_rollback_blocks);

    manager
        .add_transaction_support(TransactionPluginFactory::create(
            HashLockTransactionBody,
            TransactionPluginFactoryOptions::Default,
        ))?
        .add_cache::<HashLockInfoCacheDescriptor>()?;

    manager.add_stateless_validator(HashLockDurationValidator::new(config.max_hash_lock_duration));

    manager
        .add_stateful_validator(HashLockMosaicValidator::new(config.locked_funds_per_aggregate))
        .add_stateful_validator(HashLockCacheUniqueValidator)
        .add_stateful_validator(AggregateHashPresentValidator);

    manager
        .add_observer(HashLockObserver)
        .add_observer(CompletedAggregateObserver)
        .add_observer(ExpiredHashLockInfoObserver)
        .add_observer(HashLockPruningObserver::new(prune_interval));

    Ok(())
}
