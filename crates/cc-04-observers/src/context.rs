//! # Observer Context
//!
//! Everything an observer may touch: the block's cache delta, the resolvers
//! and the block-scoped [`ObserverState`] (receipts, queued removals and the
//! [`UndoStash`]).
//!
//! Most observers can undo a commit from the notification alone. Those that
//! delete entries (pruning) cannot, so they stash what they removed; the
//! stash travels with the block undo record and is handed back on rollback.

use crate::errors::ObserverError;
use crate::observer::NotifyMode;
use cc_01_cache::{AccountStateCacheDescriptor, BasicCacheDelta, CatapultCacheDelta, ReadOnlyCatapultCache};
use cc_02_model::{
    BlockStatement, BlockchainConfiguration, Receipt, ResolverContext, SourceChangeNotification,
    StatementBuilder, UnresolvedAmount,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    public_key_to_address, Address, Amount, Height, Key, MosaicId, NetworkIdentifier, UnresolvedAddress,
    UnresolvedMosaicId,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Encoded values observers set aside on commit, keyed by observer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoStash {
    entries: BTreeMap<String, Vec<u8>>,
}

impl UndoStash {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` under `key`, replacing any earlier value.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), ObserverError> {
        let bytes = bincode::serialize(value).map_err(|e| ObserverError::Stash {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.entries.insert(key.to_string(), bytes);
        Ok(())
    }

    /// Removes and decodes the value under `key`.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, ObserverError> {
        let Some(bytes) = self.entries.remove(key) else {
            return Ok(None);
        };
        bincode::deserialize(&bytes).map(Some).map_err(|e| ObserverError::Stash {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountRemoval {
    Address(Address),
    PublicKey(Key),
}

/// Outputs of observing one block that outlive a single transaction.
#[derive(Debug, Default)]
pub struct ObserverState {
    statement: StatementBuilder,
    removals: Vec<AccountRemoval>,
    stash: UndoStash,
}

impl ObserverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for rolling back a block whose commit produced `stash`.
    pub fn with_stash(stash: UndoStash) -> Self {
        Self {
            stash,
            ..Self::default()
        }
    }

    pub fn stash(&self) -> &UndoStash {
        &self.stash
    }

    pub fn take_stash(&mut self) -> UndoStash {
        std::mem::take(&mut self.stash)
    }

    pub fn statement(&self) -> &StatementBuilder {
        &self.statement
    }

    pub fn pending_removals(&self) -> usize {
        self.removals.len()
    }

    pub fn into_statement(self) -> BlockStatement {
        self.statement.build()
    }

    /// Applies queued account removals for `height` in request order.
    ///
    /// An account is removed only when it appeared at `height` and holds no
    /// balances; a key attached at `height` is detached. Accounts already
    /// gone are skipped.
    pub fn commit_removals(
        &mut self,
        cache: &mut CatapultCacheDelta,
        height: Height,
        network: NetworkIdentifier,
    ) -> Result<usize, ObserverError> {
        let accounts = cache.try_sub_mut::<AccountStateCacheDescriptor>()?;
        let requested = self.removals.len();

        for removal in self.removals.drain(..) {
            match removal {
                AccountRemoval::Address(address) => {
                    if accounts.contains(&address) {
                        accounts.remove_account(address, height)?;
                    }
                }
                AccountRemoval::PublicKey(public_key) => {
                    if accounts.find_by_key(&public_key, network).is_some() {
                        accounts.remove_account_with_key(public_key, network, height)?;
                    }
                }
            }
        }

        debug!("[Observer] applied {} queued account removals at height {}", requested, height);
        Ok(requested)
    }
}

pub struct ObserverContext<'a> {
    pub cache: &'a mut CatapultCacheDelta,
    pub height: Height,
    pub mode: NotifyMode,
    pub config: &'a BlockchainConfiguration,
    pub resolvers: &'a ResolverContext<'a>,
    state: &'a mut ObserverState,
}

impl<'a> ObserverContext<'a> {
    pub fn new(
        cache: &'a mut CatapultCacheDelta,
        height: Height,
        mode: NotifyMode,
        config: &'a BlockchainConfiguration,
        resolvers: &'a ResolverContext<'a>,
        state: &'a mut ObserverState,
    ) -> Self {
        Self {
            cache,
            height,
            mode,
            config,
            resolvers,
            state,
        }
    }

    pub fn network(&self) -> NetworkIdentifier {
        self.config.network
    }

    pub fn is_commit(&self) -> bool {
        self.mode == NotifyMode::Commit
    }

    pub fn read_only(&self) -> ReadOnlyCatapultCache<'_> {
        self.cache.as_read_only()
    }

    pub fn address_of(&self, public_key: &Key) -> Address {
        public_key_to_address(public_key, self.config.network)
    }

    pub fn resolve_mosaic_id(&self, mosaic_id: UnresolvedMosaicId) -> MosaicId {
        self.resolvers.resolve_mosaic_id(self.cache.as_read_only(), mosaic_id)
    }

    pub fn resolve_address(&self, address: &UnresolvedAddress) -> Address {
        self.resolvers.resolve_address(self.cache.as_read_only(), address)
    }

    pub fn resolve_amount(&self, amount: &UnresolvedAmount) -> Result<Amount, ObserverError> {
        Ok(self.resolvers.resolve_amount(self.cache.as_read_only(), amount)?)
    }

    pub fn resolve_levy_mosaic(&self, mosaic_id: MosaicId) -> MosaicId {
        self.resolvers.resolve_levy_mosaic(self.cache.as_read_only(), mosaic_id)
    }

    pub fn resolve_levy_address(&self, mosaic_id: MosaicId) -> Option<Address> {
        self.resolvers.resolve_levy_address(self.cache.as_read_only(), mosaic_id)
    }

    pub fn accounts_mut(&mut self) -> Result<&mut BasicCacheDelta<AccountStateCacheDescriptor>, ObserverError> {
        Ok(self.cache.try_sub_mut::<AccountStateCacheDescriptor>()?)
    }

    /// Records a receipt under the current source; ignored during rollback.
    pub fn add_receipt(&mut self, receipt: Receipt) {
        if self.is_commit() {
            self.state.statement.add_receipt(receipt);
        } else {
            trace!("[Observer] dropping {:?} receipt in rollback", receipt.receipt_type);
        }
    }

    /// Sets `value` aside for the rollback of the current block.
    pub fn stash<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), ObserverError> {
        self.state.stash.put(key, value)
    }

    /// Takes back a value stashed when the current block was committed.
    pub fn unstash<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, ObserverError> {
        self.state.stash.take(key)
    }

    pub(crate) fn apply_source_change(&mut self, change: &SourceChangeNotification) {
        self.state.statement.apply_source_change(change);
    }

    /// Queues removal of an account added by address at the current height.
    pub fn queue_address_removal(&mut self, address: Address) {
        self.state.removals.push(AccountRemoval::Address(address));
    }

    pub(crate) fn queue_public_key_removal(&mut self, public_key: Key) {
        self.state.removals.push(AccountRemoval::PublicKey(public_key));
    }
}
