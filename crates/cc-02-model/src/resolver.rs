//! # Resolvers
//!
//! Turns unresolved identifiers and deferred amounts into concrete values
//! against a read-only cache. Plugins register resolvers that either answer
//! or decline; the first answer in registration order wins, otherwise the
//! default resolution applies.
//!
//! | resolver     | default                         |
//! |--------------|---------------------------------|
//! | mosaic id    | same numeric id                 |
//! | address      | same bytes                      |
//! | amount       | zero                            |
//! | levy mosaic  | the transferred mosaic          |
//! | levy address | none (no levy)                  |

use crate::amounts::{DeferredAmountDescriptor, UnresolvedAmount};
use crate::errors::ResolveError;
use crate::mempool::Mempool;
use cc_01_cache::ReadOnlyCatapultCache;
use shared_types::{Address, Amount, MosaicId, UnresolvedAddress, UnresolvedMosaicId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type MosaicIdResolver =
    Arc<dyn Fn(ReadOnlyCatapultCache<'_>, UnresolvedMosaicId) -> Option<MosaicId> + Send + Sync>;
pub type AddressResolver =
    Arc<dyn Fn(ReadOnlyCatapultCache<'_>, &UnresolvedAddress) -> Option<Address> + Send + Sync>;
pub type AmountResolver = Arc<
    dyn Fn(ReadOnlyCatapultCache<'_>, &DeferredAmountDescriptor, &Resolvers) -> Option<Amount>
        + Send
        + Sync,
>;
pub type LevyMosaicResolver =
    Arc<dyn Fn(ReadOnlyCatapultCache<'_>, MosaicId) -> Option<MosaicId> + Send + Sync>;
pub type LevyAddressResolver =
    Arc<dyn Fn(ReadOnlyCatapultCache<'_>, MosaicId) -> Option<Address> + Send + Sync>;

/// Aggregated resolvers, built once at startup.
#[derive(Clone, Default)]
pub struct Resolvers {
    mosaic_id: Vec<MosaicIdResolver>,
    address: Vec<AddressResolver>,
    amount: Vec<AmountResolver>,
    levy_mosaic: Vec<LevyMosaicResolver>,
    levy_address: Vec<LevyAddressResolver>,
}

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mosaic_id_resolver(
        &mut self,
        resolver: impl Fn(ReadOnlyCatapultCache<'_>, UnresolvedMosaicId) -> Option<MosaicId>
            + Send
            + Sync
            + 'static,
    ) {
        self.mosaic_id.push(Arc::new(resolver));
    }

    pub fn add_address_resolver(
        &mut self,
        resolver: impl Fn(ReadOnlyCatapultCache<'_>, &UnresolvedAddress) -> Option<Address>
            + Send
            + Sync
            + 'static,
    ) {
        self.address.push(Arc::new(resolver));
    }

    pub fn add_amount_resolver(
        &mut self,
        resolver: impl Fn(ReadOnlyCatapultCache<'_>, &DeferredAmountDescriptor, &Resolvers) -> Option<Amount>
            + Send
            + Sync
            + 'static,
    ) {
        self.amount.push(Arc::new(resolver));
    }

    pub fn add_levy_mosaic_resolver(
        &mut self,
        resolver: impl Fn(ReadOnlyCatapultCache<'_>, MosaicId) -> Option<MosaicId> + Send + Sync + 'static,
    ) {
        self.levy_mosaic.push(Arc::new(resolver));
    }

    pub fn add_levy_address_resolver(
        &mut self,
        resolver: impl Fn(ReadOnlyCatapultCache<'_>, MosaicId) -> Option<Address> + Send + Sync + 'static,
    ) {
        self.levy_address.push(Arc::new(resolver));
    }

    pub fn resolve_mosaic_id(&self, cache: ReadOnlyCatapultCache<'_>, mosaic_id: UnresolvedMosaicId) -> MosaicId {
        self.mosaic_id
            .iter()
            .find_map(|resolver| resolver(cache, mosaic_id))
            .unwrap_or(MosaicId(mosaic_id.0))
    }

    pub fn resolve_address(&self, cache: ReadOnlyCatapultCache<'_>, address: &UnresolvedAddress) -> Address {
        self.address
            .iter()
            .find_map(|resolver| resolver(cache, address))
            .unwrap_or(Address(address.0))
    }

    pub fn resolve_deferred_amount(
        &self,
        cache: ReadOnlyCatapultCache<'_>,
        descriptor: &DeferredAmountDescriptor,
    ) -> Amount {
        self.amount
            .iter()
            .find_map(|resolver| resolver(cache, descriptor, self))
            .unwrap_or_default()
    }

    /// Mosaic in which the levy for transferring `mosaic_id` is paid.
    pub fn resolve_levy_mosaic(&self, cache: ReadOnlyCatapultCache<'_>, mosaic_id: MosaicId) -> MosaicId {
        self.levy_mosaic
            .iter()
            .find_map(|resolver| resolver(cache, mosaic_id))
            .unwrap_or(mosaic_id)
    }

    /// Recipient of the levy for transferring `mosaic_id`, if any.
    pub fn resolve_levy_address(&self, cache: ReadOnlyCatapultCache<'_>, mosaic_id: MosaicId) -> Option<Address> {
        self.levy_address
            .iter()
            .find_map(|resolver| resolver(cache, mosaic_id))
    }
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolvers")
            .field("mosaic_id", &self.mosaic_id.len())
            .field("address", &self.address.len())
            .field("amount", &self.amount.len())
            .field("levy_mosaic", &self.levy_mosaic.len())
            .field("levy_address", &self.levy_address.len())
            .finish()
    }
}

/// Resolvers bound to one publishing pass.
///
/// Deferred amounts are looked up in the pass mempool and memoized, so every
/// deferred value is computed once and all later lookups agree.
pub struct ResolverContext<'a> {
    resolvers: &'a Resolvers,
    mempool: Option<&'a Mempool>,
    resolved: RefCell<HashMap<(u64, usize), Amount>>,
}

impl<'a> ResolverContext<'a> {
    pub fn new(resolvers: &'a Resolvers, mempool: &'a Mempool) -> Self {
        Self {
            resolvers,
            mempool: Some(mempool),
            resolved: RefCell::new(HashMap::new()),
        }
    }

    /// Context for replaying materialized notifications, which carry no deferred amounts.
    pub fn without_mempool(resolvers: &'a Resolvers) -> Self {
        Self {
            resolvers,
            mempool: None,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    pub fn resolvers(&self) -> &'a Resolvers {
        self.resolvers
    }

    pub fn resolve_mosaic_id(&self, cache: ReadOnlyCatapultCache<'_>, mosaic_id: UnresolvedMosaicId) -> MosaicId {
        self.resolvers.resolve_mosaic_id(cache, mosaic_id)
    }

    pub fn resolve_address(&self, cache: ReadOnlyCatapultCache<'_>, address: &UnresolvedAddress) -> Address {
        self.resolvers.resolve_address(cache, address)
    }

    pub fn resolve_levy_mosaic(&self, cache: ReadOnlyCatapultCache<'_>, mosaic_id: MosaicId) -> MosaicId {
        self.resolvers.resolve_levy_mosaic(cache, mosaic_id)
    }

    pub fn resolve_levy_address(&self, cache: ReadOnlyCatapultCache<'_>, mosaic_id: MosaicId) -> Option<Address> {
        self.resolvers.resolve_levy_address(cache, mosaic_id)
    }

    pub fn resolve_amount(
        &self,
        cache: ReadOnlyCatapultCache<'_>,
        amount: &UnresolvedAmount,
    ) -> Result<Amount, ResolveError> {
        let deferred = match amount {
            UnresolvedAmount::Concrete(value) => return Ok(*value),
            UnresolvedAmount::Deferred(deferred) => deferred,
        };

        let key = deferred.descriptor.slot_key();
        if let Some(value) = self.resolved.borrow().get(&key) {
            return Ok(*value);
        }

        let descriptor = self
            .mempool
            .and_then(|mempool| mempool.get(deferred.descriptor))
            .ok_or_else(|| ResolveError::MissingDescriptor {
                reference: format!("{:?}", deferred.descriptor),
            })?;

        let value = self.resolvers.resolve_deferred_amount(cache, descriptor);
        self.resolved.borrow_mut().insert(key, value);
        Ok(value)
    }
}
