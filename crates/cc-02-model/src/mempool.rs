//! # Mempool
//!
//! Scoped arena for data synthesized while one transaction is published.
//! The subscriber owns the mempool; it is dropped when the pass ends.
//! References are typed indexes tagged with the owning pass, so a reference
//! can never resolve against another pass's arena.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MEMPOOL_ID: AtomicU64 = AtomicU64::new(1);

/// Per-pass arena.
pub struct Mempool {
    id: u64,
    slots: Vec<Box<dyn Any + Send>>,
}

impl Mempool {
    pub fn new() -> Self {
        Self {
            id: NEXT_MEMPOOL_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
        }
    }

    /// Moves `value` into the arena.
    pub fn push<T: Any + Send>(&mut self, value: T) -> MempoolRef<T> {
        self.slots.push(Box::new(value));
        MempoolRef {
            mempool_id: self.id,
            index: self.slots.len() - 1,
            _marker: PhantomData,
        }
    }

    /// Value behind `reference`, or `None` when it belongs to another pass.
    pub fn get<T: Any + Send>(&self, reference: MempoolRef<T>) -> Option<&T> {
        if reference.mempool_id != self.id {
            return None;
        }

        self.slots.get(reference.index)?.downcast_ref::<T>()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for Mempool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mempool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mempool")
            .field("id", &self.id)
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Typed reference into a [`Mempool`].
pub struct MempoolRef<T> {
    mempool_id: u64,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MempoolRef<T> {
    /// Key identifying this slot across passes.
    pub(crate) fn slot_key(&self) -> (u64, usize) {
        (self.mempool_id, self.index)
    }
}

impl<T> Clone for MempoolRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MempoolRef<T> {}

impl<T> PartialEq for MempoolRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.mempool_id == other.mempool_id && self.index == other.index
    }
}

impl<T> Eq for MempoolRef<T> {}

impl<T> fmt::Debug for MempoolRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MempoolRef({}:{})", self.mempool_id, self.index)
    }
}
