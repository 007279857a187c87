//! Read-only context handed to stateful validators.
//!
//! Every notification of a transaction is validated against the same cache
//! snapshot. Balance validators therefore share a [`BalanceTally`] that
//! carries the debits and credits already approved for that transaction.

use cc_01_cache::{AccountStateCacheDescriptor, ReadOnlyCatapultCache};
use cc_02_model::{BlockchainConfiguration, ResolveError, ResolverContext, UnresolvedAmount};
use shared_types::{
    public_key_to_address, Address, Amount, Height, Key, MosaicId, NetworkIdentifier, Timestamp,
    UnresolvedAddress, UnresolvedMosaicId,
};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PendingChange {
    credited: u128,
    debited: u128,
}

/// Balance changes approved so far within one validation pass.
#[derive(Debug, Default)]
pub struct BalanceTally {
    changes: RefCell<BTreeMap<(Address, MosaicId), PendingChange>>,
}

impl BalanceTally {
    fn pending(&self, address: &Address, mosaic_id: MosaicId) -> PendingChange {
        self.changes
            .borrow()
            .get(&(*address, mosaic_id))
            .copied()
            .unwrap_or_default()
    }

    fn update(&self, address: &Address, mosaic_id: MosaicId, apply: impl FnOnce(&mut PendingChange)) {
        apply(self.changes.borrow_mut().entry((*address, mosaic_id)).or_default());
    }

    /// Number of balances touched so far.
    pub fn len(&self) -> usize {
        self.changes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.borrow().is_empty()
    }
}

pub struct ValidatorContext<'a> {
    pub height: Height,
    pub block_time: Timestamp,
    pub config: &'a BlockchainConfiguration,
    pub cache: ReadOnlyCatapultCache<'a>,
    pub resolvers: &'a ResolverContext<'a>,
    pub balances: BalanceTally,
}

impl<'a> ValidatorContext<'a> {
    pub fn new(
        height: Height,
        block_time: Timestamp,
        config: &'a BlockchainConfiguration,
        cache: ReadOnlyCatapultCache<'a>,
        resolvers: &'a ResolverContext<'a>,
    ) -> Self {
        Self {
            height,
            block_time,
            config,
            cache,
            resolvers,
            balances: BalanceTally::default(),
        }
    }

    pub fn network(&self) -> NetworkIdentifier {
        self.config.network
    }

    pub fn address_of(&self, public_key: &Key) -> Address {
        public_key_to_address(public_key, self.config.network)
    }

    pub fn resolve_mosaic_id(&self, mosaic_id: UnresolvedMosaicId) -> MosaicId {
        self.resolvers.resolve_mosaic_id(self.cache, mosaic_id)
    }

    pub fn resolve_address(&self, address: &UnresolvedAddress) -> Address {
        self.resolvers.resolve_address(self.cache, address)
    }

    pub fn resolve_amount(&self, amount: &UnresolvedAmount) -> Result<Amount, ResolveError> {
        self.resolvers.resolve_amount(self.cache, amount)
    }

    /// Balance of `address` in the snapshot plus the changes approved so far.
    pub fn available_balance(&self, address: &Address, mosaic_id: MosaicId) -> Amount {
        let committed = self
            .cache
            .try_sub::<AccountStateCacheDescriptor>()
            .map(|accounts| accounts.balance(address, mosaic_id))
            .unwrap_or_default();
        let pending = self.balances.pending(address, mosaic_id);
        let available = (u128::from(committed.0) + pending.credited).saturating_sub(pending.debited);
        Amount(u64::try_from(available).unwrap_or(u64::MAX))
    }

    /// Approves a debit when the available balance covers it.
    ///
    /// A refused debit leaves the tally unchanged.
    pub fn reserve_debit(&self, address: &Address, mosaic_id: MosaicId, amount: Amount) -> bool {
        if amount.is_zero() {
            return true;
        }

        if self.available_balance(address, mosaic_id) < amount {
            return false;
        }

        self.balances
            .update(address, mosaic_id, |change| change.debited += u128::from(amount.0));
        true
    }

    /// Records a credit later notifications of the same pass may spend.
    pub fn record_credit(&self, address: &Address, mosaic_id: MosaicId, amount: Amount) {
        if !amount.is_zero() {
            self.balances
                .update(address, mosaic_id, |change| change.credited += u128::from(amount.0));
        }
    }
}
