//! # Account State Sub-Cache
//!
//! Core sub-cache keyed by resolved address. Accounts become known either by
//! address (first incoming transfer) or by public key (first signature).

use super::descriptor::CacheDescriptor;
use super::errors::{BalanceError, CacheError};
use crate::delta::BasicCacheDelta;
use crate::read_only::ReadOnlySubCache;
use serde::{Deserialize, Serialize};
use shared_types::{public_key_to_address, Address, Amount, Height, Key, MosaicId, NetworkIdentifier};
use std::collections::BTreeMap;

/// Mosaic balances of one account. Zero balances are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalances {
    balances: BTreeMap<MosaicId, Amount>,
}

impl AccountBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `mosaic_id`, zero when absent.
    pub fn get(&self, mosaic_id: MosaicId) -> Amount {
        self.balances.get(&mosaic_id).copied().unwrap_or_default()
    }

    pub fn credit(&mut self, mosaic_id: MosaicId, amount: Amount) -> Result<(), BalanceError> {
        if amount.is_zero() {
            return Ok(());
        }

        let updated = self
            .get(mosaic_id)
            .checked_add(amount)
            .ok_or(BalanceError::Overflow { mosaic_id })?;
        self.balances.insert(mosaic_id, updated);
        Ok(())
    }

    pub fn debit(&mut self, mosaic_id: MosaicId, amount: Amount) -> Result<(), BalanceError> {
        if amount.is_zero() {
            return Ok(());
        }

        let balance = self.get(mosaic_id);
        let updated = balance
            .checked_sub(amount)
            .ok_or(BalanceError::Insufficient {
                mosaic_id,
                balance,
                amount,
            })?;

        if updated.is_zero() {
            self.balances.remove(&mosaic_id);
        } else {
            self.balances.insert(mosaic_id, updated);
        }

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MosaicId, &Amount)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// State of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub address: Address,
    pub address_height: Height,
    pub public_key: Option<Key>,
    pub public_key_height: Height,
    pub balances: AccountBalances,
}

impl AccountState {
    pub fn new(address: Address, address_height: Height) -> Self {
        Self {
            address,
            address_height,
            public_key: None,
            public_key_height: Height(0),
            balances: AccountBalances::new(),
        }
    }
}

/// Descriptor of the account state sub-cache.
pub struct AccountStateCacheDescriptor;

impl CacheDescriptor for AccountStateCacheDescriptor {
    const NAME: &'static str = "AccountStateCache";
    type Key = Address;
    type Value = AccountState;

    fn key_of(value: &AccountState) -> Address {
        value.address
    }
}

impl BasicCacheDelta<AccountStateCacheDescriptor> {
    /// Adds an account known only by address; no-op when present.
    pub fn add_account(&mut self, address: Address, height: Height) {
        if !self.contains(&address) {
            self.set(AccountState::new(address, height));
        }
    }

    /// Adds an account by public key, or attaches the key to an address-only account.
    pub fn add_account_with_key(&mut self, public_key: Key, network: NetworkIdentifier, height: Height) {
        let address = public_key_to_address(&public_key, network);
        self.add_account(address, height);

        if let Some(account) = self.find_mut(&address) {
            if account.public_key.is_none() {
                account.public_key = Some(public_key);
                account.public_key_height = height;
            }
        }
    }

    /// Undoes [`Self::add_account_with_key`] performed at `height`.
    pub fn remove_account_with_key(
        &mut self,
        public_key: Key,
        network: NetworkIdentifier,
        height: Height,
    ) -> Result<(), CacheError> {
        let address = public_key_to_address(&public_key, network);
        self.remove_account(address, height)?;

        if let Some(account) = self.find_mut(&address) {
            if account.public_key_height == height {
                account.public_key = None;
                account.public_key_height = Height(0);
            }
        }

        Ok(())
    }

    /// Undoes [`Self::add_account`] performed at `height`.
    ///
    /// The account is removed only when it first appeared at `height` and
    /// holds no balances.
    pub fn remove_account(&mut self, address: Address, height: Height) -> Result<(), CacheError> {
        let Some(account) = self.find(&address) else {
            return Err(CacheError::MissingEntry {
                cache: AccountStateCacheDescriptor::NAME,
                key: address.to_string(),
            });
        };

        if account.address_height == height && account.balances.is_empty() {
            self.remove(&address)?;
        }

        Ok(())
    }

    /// Finds an account by public key.
    pub fn find_by_key(&self, public_key: &Key, network: NetworkIdentifier) -> Option<&AccountState> {
        self.find(&public_key_to_address(public_key, network))
    }
}

impl ReadOnlySubCache<'_, AccountStateCacheDescriptor> {
    /// Balance of `mosaic_id` held by `address`, zero for unknown accounts.
    pub fn balance(&self, address: &Address, mosaic_id: MosaicId) -> Amount {
        self.find(address)
            .map(|account| account.balances.get(mosaic_id))
            .unwrap_or_default()
    }
}
