//! Copy-on-write overlay over one committed sub-cache.

use crate::domain::{CacheDescriptor, CacheError};
use crate::storage::SubCacheState;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mutable view of one sub-cache inside a [`crate::CatapultCacheDelta`].
///
/// Changes are recorded as `key -> Some(value)` (insert/update) or
/// `key -> None` (tombstone) over the committed base; the base itself is
/// shared with views and never mutated.
#[derive(Debug)]
pub struct BasicCacheDelta<D: CacheDescriptor> {
    base: Arc<SubCacheState<D>>,
    changes: BTreeMap<D::Key, Option<D::Value>>,
}

impl<D: CacheDescriptor> BasicCacheDelta<D> {
    pub(crate) fn new(base: Arc<SubCacheState<D>>) -> Self {
        Self {
            base,
            changes: BTreeMap::new(),
        }
    }

    pub fn find(&self, key: &D::Key) -> Option<&D::Value> {
        match self.changes.get(key) {
            Some(change) => change.as_ref(),
            None => self.base.entries.get(key),
        }
    }

    pub fn contains(&self, key: &D::Key) -> bool {
        self.find(key).is_some()
    }

    /// Mutable access to an existing entry, copying it out of the base on first use.
    pub fn find_mut(&mut self, key: &D::Key) -> Option<&mut D::Value> {
        if !self.changes.contains_key(key) {
            let original = self.base.entries.get(key)?.clone();
            self.changes.insert(key.clone(), Some(original));
        }

        self.changes.get_mut(key).and_then(Option::as_mut)
    }

    /// Inserts a new entry; fails if the key is present.
    pub fn insert(&mut self, value: D::Value) -> Result<(), CacheError> {
        let key = D::key_of(&value);
        if self.contains(&key) {
            return Err(CacheError::DuplicateEntry {
                cache: D::NAME,
                key: format!("{key:?}"),
            });
        }

        self.changes.insert(key, Some(value));
        Ok(())
    }

    /// Inserts or replaces an entry.
    pub fn set(&mut self, value: D::Value) {
        let key = D::key_of(&value);
        self.changes.insert(key, Some(value));
    }

    /// Removes an entry, returning its last value; fails if the key is absent.
    pub fn remove(&mut self, key: &D::Key) -> Result<D::Value, CacheError> {
        let existing = self
            .find(key)
            .cloned()
            .ok_or_else(|| CacheError::MissingEntry {
                cache: D::NAME,
                key: format!("{key:?}"),
            })?;

        if self.base.entries.contains_key(key) {
            self.changes.insert(key.clone(), None);
        } else {
            self.changes.remove(key);
        }

        Ok(existing)
    }

    /// Number of entries visible through the delta.
    pub fn len(&self) -> usize {
        let mut size = self.base.entries.len();
        for (key, change) in &self.changes {
            match (self.base.entries.contains_key(key), change.is_some()) {
                (true, false) => size -= 1,
                (false, true) => size += 1,
                _ => {}
            }
        }

        size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when at least one visible entry differs from the committed base.
    pub fn has_changes(&self) -> bool {
        self.changes
            .iter()
            .any(|(key, change)| change.as_ref() != self.base.entries.get(key))
    }

    /// All visible entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&D::Key, &D::Value)> {
        let mut merged: BTreeMap<&D::Key, &D::Value> = self.base.entries.iter().collect();
        for (key, change) in &self.changes {
            match change {
                Some(value) => {
                    merged.insert(key, value);
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        merged.into_iter()
    }

    /// Folds the changes into a new committed state.
    pub(crate) fn into_state(self) -> Arc<SubCacheState<D>> {
        if !self.has_changes() {
            return self.base;
        }

        let mut entries = self.base.entries.clone();
        for (key, change) in self.changes {
            match change {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }

        Arc::new(SubCacheState {
            entries,
            version: self.base.version + 1,
        })
    }
}
