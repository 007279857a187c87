//! Type-erased committed sub-cache state.
//!
//! The catapult cache keeps one `Arc<dyn SubCacheStorage>` per registered
//! descriptor. Typed access downcasts to [`SubCacheState<D>`].

use crate::delta::BasicCacheDelta;
use crate::domain::{CacheDescriptor, CacheError};
use serde::Serialize;
use sha3::{Digest, Sha3_256};
use shared_types::Hash256;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable committed entries of one sub-cache.
#[derive(Debug)]
pub(crate) struct SubCacheState<D: CacheDescriptor> {
    pub(crate) entries: BTreeMap<D::Key, D::Value>,
    pub(crate) version: u64,
}

impl<D: CacheDescriptor> SubCacheState<D> {
    pub(crate) fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            version: 0,
        }
    }
}

pub(crate) trait SubCacheStorage: Send + Sync {
    fn name(&self) -> &'static str;
    fn version(&self) -> u64;
    fn len(&self) -> usize;
    fn entries_hash(&self) -> Result<Hash256, CacheError>;
    fn as_any(&self) -> &dyn Any;
    fn create_changes(self: Arc<Self>) -> Box<dyn SubCacheChanges>;
}

impl<D: CacheDescriptor> SubCacheStorage for SubCacheState<D> {
    fn name(&self) -> &'static str {
        D::NAME
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries_hash(&self) -> Result<Hash256, CacheError> {
        hash_entries(D::NAME, self.entries.iter())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn create_changes(self: Arc<Self>) -> Box<dyn SubCacheChanges> {
        Box::new(BasicCacheDelta::<D>::new(self))
    }
}

/// Pending changes of one sub-cache inside a catapult cache delta.
pub(crate) trait SubCacheChanges: Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn has_changes(&self) -> bool;
    fn entries_hash(&self) -> Result<Hash256, CacheError>;
    fn commit(self: Box<Self>) -> Arc<dyn SubCacheStorage>;
}

impl<D: CacheDescriptor> SubCacheChanges for BasicCacheDelta<D> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn has_changes(&self) -> bool {
        BasicCacheDelta::has_changes(self)
    }

    fn entries_hash(&self) -> Result<Hash256, CacheError> {
        hash_entries(D::NAME, self.iter())
    }

    fn commit(self: Box<Self>) -> Arc<dyn SubCacheStorage> {
        self.into_state()
    }
}

/// Hashes the ordered entries of a sub-cache.
pub(crate) fn hash_entries<'a, K, V>(
    name: &'static str,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
) -> Result<Hash256, CacheError>
where
    K: Serialize + 'a,
    V: Serialize + 'a,
{
    let mut hasher = Sha3_256::new();
    hasher.update(name.as_bytes());
    for entry in entries {
        let bytes = bincode::serialize(&entry).map_err(|e| CacheError::Serialization {
            cache: name,
            reason: e.to_string(),
        })?;
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }

    Ok(Hash256(hasher.finalize().into()))
}
