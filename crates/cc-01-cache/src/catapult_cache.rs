//! # Catapult Cache
//!
//! Committed state is one `Arc<CommittedState>` holding every sub-cache.
//! Views clone the `Arc`; commit builds the next state completely and swaps
//! it in under the write lock, so a commit is all-or-nothing and views keep
//! the state they were created from.

use crate::delta::BasicCacheDelta;
use crate::domain::{CacheDescriptor, CacheError};
use crate::read_only::{ReadOnlyCatapultCache, ReadOnlySubCache};
use crate::storage::{SubCacheChanges, SubCacheState, SubCacheStorage};
use parking_lot::RwLock;
use shared_types::{sha3_256, Hash256, Height};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Debug, Default)]
struct SubCacheRegistry {
    indexes: HashMap<TypeId, usize>,
    names: Vec<&'static str>,
}

impl SubCacheRegistry {
    fn index_of<D: CacheDescriptor>(&self) -> Result<usize, CacheError> {
        self.indexes
            .get(&TypeId::of::<D>())
            .copied()
            .ok_or(CacheError::UnregisteredSubCache { name: D::NAME })
    }
}

struct CommittedState {
    height: Height,
    sub_caches: Vec<Arc<dyn SubCacheStorage>>,
}

impl CommittedState {
    fn typed<D: CacheDescriptor>(&self, index: usize) -> Result<&SubCacheState<D>, CacheError> {
        self.sub_caches
            .get(index)
            .and_then(|storage| storage.as_any().downcast_ref::<SubCacheState<D>>())
            .ok_or(CacheError::UnregisteredSubCache { name: D::NAME })
    }

    fn state_hash(&self) -> Result<Hash256, CacheError> {
        let mut roots = Vec::with_capacity(self.sub_caches.len() * Hash256::SIZE);
        for storage in &self.sub_caches {
            roots.extend_from_slice(storage.entries_hash()?.as_ref());
        }

        Ok(sha3_256(&[&roots]))
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Collects sub-cache registrations before the cache is created.
#[derive(Default)]
pub struct CatapultCacheBuilder {
    registry: SubCacheRegistry,
    sub_caches: Vec<Arc<dyn SubCacheStorage>>,
}

impl CatapultCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty sub-cache for descriptor `D`.
    pub fn add<D: CacheDescriptor>(&mut self) -> Result<&mut Self, CacheError> {
        let type_id = TypeId::of::<D>();
        if self.registry.indexes.contains_key(&type_id) {
            return Err(CacheError::DuplicateSubCache { name: D::NAME });
        }

        self.registry.indexes.insert(type_id, self.sub_caches.len());
        self.registry.names.push(D::NAME);
        self.sub_caches.push(Arc::new(SubCacheState::<D>::empty()));
        Ok(self)
    }

    pub fn build(self) -> CatapultCache {
        debug!(
            "[Cache] built catapult cache with sub-caches {:?}",
            self.registry.names
        );

        CatapultCache {
            registry: Arc::new(self.registry),
            state: RwLock::new(Arc::new(CommittedState {
                height: Height(0),
                sub_caches: self.sub_caches,
            })),
            delta_outstanding: Arc::new(AtomicBool::new(false)),
        }
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Versioned collection of typed sub-caches.
pub struct CatapultCache {
    registry: Arc<SubCacheRegistry>,
    state: RwLock<Arc<CommittedState>>,
    delta_outstanding: Arc<AtomicBool>,
}

impl CatapultCache {
    pub fn builder() -> CatapultCacheBuilder {
        CatapultCacheBuilder::new()
    }

    /// Height of the last commit.
    pub fn height(&self) -> Height {
        self.state.read().height
    }

    /// Names of the registered sub-caches in registration order.
    pub fn sub_cache_names(&self) -> &[&'static str] {
        &self.registry.names
    }

    /// Read-only snapshot of the committed state.
    pub fn create_view(&self) -> CatapultCacheView {
        CatapultCacheView {
            registry: Arc::clone(&self.registry),
            state: Arc::clone(&self.state.read()),
        }
    }

    /// Mutable overlay over the committed state. Only one may exist at a time.
    pub fn create_delta(&self) -> Result<CatapultCacheDelta, CacheError> {
        if self.delta_outstanding.swap(true, Ordering::AcqRel) {
            return Err(CacheError::DeltaOutstanding);
        }

        let base = Arc::clone(&self.state.read());
        let sub_caches = base
            .sub_caches
            .iter()
            .map(|storage| Arc::clone(storage).create_changes())
            .collect();

        Ok(CatapultCacheDelta {
            registry: Arc::clone(&self.registry),
            base,
            sub_caches,
            _lease: DeltaLease(Arc::clone(&self.delta_outstanding)),
        })
    }

    /// Promotes every change in `delta` and records `height`.
    pub fn commit(&self, delta: CatapultCacheDelta, height: Height) -> Result<(), CacheError> {
        if !Arc::ptr_eq(&delta.registry, &self.registry) {
            return Err(CacheError::ForeignDelta);
        }

        let mut state = self.state.write();
        if !Arc::ptr_eq(&delta.base, &state) {
            return Err(CacheError::StaleDelta {
                committed: state.height.0,
                base: delta.base.height.0,
            });
        }

        let CatapultCacheDelta {
            sub_caches, _lease, ..
        } = delta;

        let mut changed = 0usize;
        let committed: Vec<Arc<dyn SubCacheStorage>> = sub_caches
            .into_iter()
            .map(|changes| {
                if changes.has_changes() {
                    changed += 1;
                }
                changes.commit()
            })
            .collect();

        *state = Arc::new(CommittedState {
            height,
            sub_caches: committed,
        });

        info!(
            "[Cache] committed height {} ({} sub-caches changed)",
            height, changed
        );
        Ok(())
    }
}

/// Clears the outstanding-delta flag when the delta is committed or dropped.
struct DeltaLease(Arc<AtomicBool>);

impl Drop for DeltaLease {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// Immutable snapshot of committed state, cheap to clone and share.
#[derive(Clone)]
pub struct CatapultCacheView {
    registry: Arc<SubCacheRegistry>,
    state: Arc<CommittedState>,
}

impl CatapultCacheView {
    pub fn height(&self) -> Height {
        self.state.height
    }

    pub fn try_sub<D: CacheDescriptor>(&self) -> Result<ReadOnlySubCache<'_, D>, CacheError> {
        let index = self.registry.index_of::<D>()?;
        let state = self.state.typed::<D>(index)?;
        Ok(ReadOnlySubCache::committed(&state.entries))
    }

    /// Typed read access to sub-cache `D`.
    ///
    /// # Panics
    ///
    /// Panics if `D` was not registered with the builder.
    pub fn sub<D: CacheDescriptor>(&self) -> ReadOnlySubCache<'_, D> {
        self.try_sub::<D>()
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Committed entries of sub-cache `D` in key order.
    pub fn entries<D: CacheDescriptor>(
        &self,
    ) -> Result<impl Iterator<Item = (&D::Key, &D::Value)>, CacheError> {
        let index = self.registry.index_of::<D>()?;
        Ok(self.state.typed::<D>(index)?.entries.iter())
    }

    /// Number of commits that changed sub-cache `D`.
    pub fn sub_cache_version<D: CacheDescriptor>(&self) -> Result<u64, CacheError> {
        let index = self.registry.index_of::<D>()?;
        Ok(self.state.sub_caches[index].version())
    }

    /// Number of entries in each sub-cache, by name.
    pub fn sub_cache_sizes(&self) -> Vec<(&'static str, usize)> {
        self.state
            .sub_caches
            .iter()
            .map(|storage| (storage.name(), storage.len()))
            .collect()
    }

    /// Hash over all committed sub-cache entries.
    pub fn state_hash(&self) -> Result<Hash256, CacheError> {
        self.state.state_hash()
    }

    pub fn as_read_only(&self) -> ReadOnlyCatapultCache<'_> {
        ReadOnlyCatapultCache::from_view(self)
    }
}

// =============================================================================
// DELTA
// =============================================================================

/// Single-writer overlay over the committed state.
pub struct CatapultCacheDelta {
    registry: Arc<SubCacheRegistry>,
    base: Arc<CommittedState>,
    sub_caches: Vec<Box<dyn SubCacheChanges>>,
    _lease: DeltaLease,
}

impl CatapultCacheDelta {
    /// Height of the state this delta was created from.
    pub fn base_height(&self) -> Height {
        self.base.height
    }

    pub fn try_sub<D: CacheDescriptor>(&self) -> Result<&BasicCacheDelta<D>, CacheError> {
        let index = self.registry.index_of::<D>()?;
        self.sub_caches[index]
            .as_any()
            .downcast_ref::<BasicCacheDelta<D>>()
            .ok_or(CacheError::UnregisteredSubCache { name: D::NAME })
    }

    pub fn try_sub_mut<D: CacheDescriptor>(
        &mut self,
    ) -> Result<&mut BasicCacheDelta<D>, CacheError> {
        let index = self.registry.index_of::<D>()?;
        self.sub_caches[index]
            .as_any_mut()
            .downcast_mut::<BasicCacheDelta<D>>()
            .ok_or(CacheError::UnregisteredSubCache { name: D::NAME })
    }

    /// Typed read access to sub-cache `D`.
    ///
    /// # Panics
    ///
    /// Panics if `D` was not registered with the builder.
    pub fn sub<D: CacheDescriptor>(&self) -> &BasicCacheDelta<D> {
        self.try_sub::<D>()
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Typed write access to sub-cache `D`.
    ///
    /// # Panics
    ///
    /// Panics if `D` was not registered with the builder.
    pub fn sub_mut<D: CacheDescriptor>(&mut self) -> &mut BasicCacheDelta<D> {
        self.try_sub_mut::<D>()
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// True when any sub-cache differs from the base.
    pub fn has_changes(&self) -> bool {
        self.sub_caches.iter().any(|changes| changes.has_changes())
    }

    /// Hash over all entries visible through the delta.
    ///
    /// Equals the view state hash after committing this delta.
    pub fn state_hash(&self) -> Result<Hash256, CacheError> {
        let mut roots = Vec::with_capacity(self.sub_caches.len() * Hash256::SIZE);
        for changes in &self.sub_caches {
            roots.extend_from_slice(changes.entries_hash()?.as_ref());
        }

        Ok(sha3_256(&[&roots]))
    }

    pub fn as_read_only(&self) -> ReadOnlyCatapultCache<'_> {
        ReadOnlyCatapultCache::from_delta(self)
    }
}
