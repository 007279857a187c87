//! Read-only access shared by views and deltas.
//!
//! Validators and resolvers take a [`ReadOnlyCatapultCache`] so the same
//! code runs against a committed snapshot or against the in-flight delta.

use crate::catapult_cache::{CatapultCacheDelta, CatapultCacheView};
use crate::delta::BasicCacheDelta;
use crate::domain::{CacheDescriptor, CacheError};
use shared_types::Height;
use std::collections::BTreeMap;

/// Read-only handle to a view or a delta.
#[derive(Clone, Copy)]
pub struct ReadOnlyCatapultCache<'a> {
    source: CacheSource<'a>,
}

#[derive(Clone, Copy)]
enum CacheSource<'a> {
    View(&'a CatapultCacheView),
    Delta(&'a CatapultCacheDelta),
}

impl<'a> ReadOnlyCatapultCache<'a> {
    pub fn from_view(view: &'a CatapultCacheView) -> Self {
        Self {
            source: CacheSource::View(view),
        }
    }

    pub fn from_delta(delta: &'a CatapultCacheDelta) -> Self {
        Self {
            source: CacheSource::Delta(delta),
        }
    }

    /// Committed height underlying this handle.
    pub fn height(&self) -> Height {
        match self.source {
            CacheSource::View(view) => view.height(),
            CacheSource::Delta(delta) => delta.base_height(),
        }
    }

    pub fn try_sub<D: CacheDescriptor>(&self) -> Result<ReadOnlySubCache<'a, D>, CacheError> {
        match self.source {
            CacheSource::View(view) => view.try_sub::<D>(),
            CacheSource::Delta(delta) => delta.try_sub::<D>().map(ReadOnlySubCache::delta),
        }
    }

    /// Typed read access to sub-cache `D`.
    ///
    /// # Panics
    ///
    /// Panics if `D` was not registered with the builder.
    pub fn sub<D: CacheDescriptor>(&self) -> ReadOnlySubCache<'a, D> {
        self.try_sub::<D>()
            .unwrap_or_else(|error| panic!("{error}"))
    }
}

/// Read-only handle to one sub-cache.
pub struct ReadOnlySubCache<'a, D: CacheDescriptor> {
    source: SubCacheSource<'a, D>,
}

enum SubCacheSource<'a, D: CacheDescriptor> {
    Committed(&'a BTreeMap<D::Key, D::Value>),
    Delta(&'a BasicCacheDelta<D>),
}

impl<D: CacheDescriptor> Clone for SubCacheSource<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: CacheDescriptor> Copy for SubCacheSource<'_, D> {}

impl<D: CacheDescriptor> Clone for ReadOnlySubCache<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: CacheDescriptor> Copy for ReadOnlySubCache<'_, D> {}

impl<'a, D: CacheDescriptor> ReadOnlySubCache<'a, D> {
    pub(crate) fn committed(entries: &'a BTreeMap<D::Key, D::Value>) -> Self {
        Self {
            source: SubCacheSource::Committed(entries),
        }
    }

    pub(crate) fn delta(delta: &'a BasicCacheDelta<D>) -> Self {
        Self {
            source: SubCacheSource::Delta(delta),
        }
    }

    pub fn find(&self, key: &D::Key) -> Option<&'a D::Value> {
        match self.source {
            SubCacheSource::Committed(entries) => entries.get(key),
            SubCacheSource::Delta(delta) => delta.find(key),
        }
    }

    pub fn contains(&self, key: &D::Key) -> bool {
        self.find(key).is_some()
    }

    pub fn len(&self) -> usize {
        match self.source {
            SubCacheSource::Committed(entries) => entries.len(),
            SubCacheSource::Delta(delta) => delta.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
