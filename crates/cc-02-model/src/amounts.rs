//! Amounts that may be known only during observation.

use crate::mempool::{Mempool, MempoolRef};
use shared_types::{Amount, UnresolvedMosaicId};

/// Operation a deferred amount stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredAmountKind {
    /// Levy charged by a mosaic's owner on a transfer of that mosaic.
    MosaicLevy,
}

/// Side data of a deferred amount, stored in the pass mempool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAmountDescriptor {
    MosaicLevy {
        mosaic_id: UnresolvedMosaicId,
        transfer_amount: Amount,
    },
}

impl DeferredAmountDescriptor {
    pub fn kind(&self) -> DeferredAmountKind {
        match self {
            Self::MosaicLevy { .. } => DeferredAmountKind::MosaicLevy,
        }
    }
}

/// Reference to a deferred computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredAmount {
    pub kind: DeferredAmountKind,
    pub descriptor: MempoolRef<DeferredAmountDescriptor>,
}

/// Concrete amount or deferred computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedAmount {
    Concrete(Amount),
    Deferred(DeferredAmount),
}

impl UnresolvedAmount {
    /// Stores `descriptor` in `mempool` and returns a deferred amount pointing at it.
    pub fn defer(mempool: &mut Mempool, descriptor: DeferredAmountDescriptor) -> Self {
        let kind = descriptor.kind();
        Self::Deferred(DeferredAmount {
            kind,
            descriptor: mempool.push(descriptor),
        })
    }

    /// The amount when it is already known.
    pub fn concrete(&self) -> Option<Amount> {
        match self {
            Self::Concrete(amount) => Some(*amount),
            Self::Deferred(_) => None,
        }
    }
}

impl From<Amount> for UnresolvedAmount {
    fn from(amount: Amount) -> Self {
        Self::Concrete(amount)
    }
}
