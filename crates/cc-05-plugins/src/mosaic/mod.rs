//! # Mosaic Levy Plugin
//!
//! Mosaic definitions that may charge a levy whenever the mosaic is
//! transferred. The transfer plugin emits one levy notification per mosaic
//! leg with a deferred fee; the resolvers registered here turn that fee into
//! a concrete amount from the levy definition.
//!
//! | levy type    | fee                                       |
//! |--------------|-------------------------------------------|
//! | `Absolute`   | `fee`                                     |
//! | `Percentile` | `transfer_amount × fee / 10'000` (bps)    |

mod levy;

pub use levy::{
    MosaicLevyTransferObserver, MosaicLevyTransferValidator, FAILURE_MOSAIC_LEVY_INSUFFICIENT_BALANCE,
};

use crate::errors::PluginError;
use crate::manager::PluginManager;
use cc_01_cache::{CacheDescriptor, ReadOnlyCatapultCache};
use cc_02_model::DeferredAmountDescriptor;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, Key, MosaicId};

/// Basis points making up a whole transfer amount.
pub const PERCENTILE_DIVISOR: u64 = 10_000;

// =============================================================================
// CACHE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MosaicLevyType {
    Absolute,
    Percentile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicLevy {
    pub levy_type: MosaicLevyType,
    pub recipient: Address,
    /// Mosaic the levy is paid in.
    pub mosaic_id: MosaicId,
    pub fee: Amount,
}

impl MosaicLevy {
    /// Levy owed for transferring `transfer_amount` of the levied mosaic.
    pub fn fee_for(&self, transfer_amount: Amount) -> Amount {
        match self.levy_type {
            MosaicLevyType::Absolute => self.fee,
            MosaicLevyType::Percentile => {
                let fee = u128::from(transfer_amount.0) * u128::from(self.fee.0)
                    / u128::from(PERCENTILE_DIVISOR);
                Amount(u64::try_from(fee).unwrap_or(u64::MAX))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicEntry {
    pub mosaic_id: MosaicId,
    pub owner: Key,
    pub levy: Option<MosaicLevy>,
}

pub struct MosaicCacheDescriptor;

impl CacheDescriptor for MosaicCacheDescriptor {
    const NAME: &'static str = "MosaicCache";
    type Key = MosaicId;
    type Value = MosaicEntry;

    fn key_of(value: &MosaicEntry) -> MosaicId {
        value.mosaic_id
    }
}

fn find_levy(cache: ReadOnlyCatapultCache<'_>, mosaic_id: MosaicId) -> Option<MosaicLevy> {
    cache
        .try_sub::<MosaicCacheDescriptor>()
        .ok()?
        .find(&mosaic_id)?
        .levy
}

// =============================================================================
// REGISTRATION
// =============================================================================

pub fn register_mosaic_subsystem(manager: &mut PluginManager) -> Result<(), PluginError> {
    manager.add_cache::<MosaicCacheDescriptor>()?;

    let resolvers = manager.resolvers_mut();
    resolvers.add_levy_mosaic_resolver(|cache, mosaic_id| {
        find_levy(cache, mosaic_id).map(|levy| levy.mosaic_id)
    });
    resolvers.add_levy_address_resolver(|cache, mosaic_id| {
        find_levy(cache, mosaic_id).map(|levy| levy.recipient)
    });
    resolvers.add_amount_resolver(|cache, descriptor, resolvers| match descriptor {
        DeferredAmountDescriptor::MosaicLevy {
            mosaic_id,
            transfer_amount,
        } => {
            let mosaic_id = resolvers.resolve_mosaic_id(cache, *mosaic_id);
            find_levy(cache, mosaic_id).map(|levy| levy.fee_for(*transfer_amount))
        }
    });

    manager
        .add_stateful_validator(MosaicLevyTransferValidator)
        .add_observer(MosaicLevyTransferObserver);

    Ok(())
}
