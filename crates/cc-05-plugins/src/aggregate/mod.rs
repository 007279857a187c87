//! # Aggregate Plugin
//!
//! Bundles embedded transactions under one top-level signature. Complete
//! aggregates carry every required cosignature; bonded aggregates are only
//! registered when `enableBondedAggregateSupport` is set.
//!
//! Embedded transactions are published inline, each preceded by a relative
//! source change so receipts are attributed to the embedded index.

mod transaction;
mod validators;

pub use transaction::{AggregateTransaction, AggregateTransactionPlugin};
pub use validators::*;

use crate::errors::PluginError;
use crate::manager::PluginManager;
use cc_02_model::PluginConfiguration;
use shared_types::{ConfigError, ConfigSectionReader, EntityType, TimeSpan};
use tracing::debug;

const DEFAULT_MAX_BONDED_TRANSACTION_LIFETIME: TimeSpan = TimeSpan::from_hours(48);

/// `[plugin:aggregate]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateConfiguration {
    pub max_transactions: u32,
    pub max_cosignatures_per_aggregate: u8,
    /// The aggregate signer must itself be an eligible cosigner.
    pub enable_strict_cosignature_check: bool,
    pub enable_bonded_aggregate_support: bool,
    pub max_bonded_transaction_lifetime: TimeSpan,
}

impl PluginConfiguration for AggregateConfiguration {
    const SECTION: &'static str = "plugin:aggregate";

    fn load(reader: &mut ConfigSectionReader<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            max_transactions: reader.get("maxTransactions")?,
            max_cosignatures_per_aggregate: reader.get("maxCosignaturesPerAggregate")?,
            enable_strict_cosignature_check: reader.get("enableStrictCosignatureCheck")?,
            enable_bonded_aggregate_support: reader.get("enableBondedAggregateSupport")?,
            max_bonded_transaction_lifetime: reader
                .get_or("maxBondedTransactionLifetime", DEFAULT_MAX_BONDED_TRANSACTION_LIFETIME)?,
        })
    }
}

pub fn register_aggregate_subsystem(manager: &mut PluginManager) -> Result<(), PluginError> {
    let config = manager.config().plugin_config::<AggregateConfiguration>()?;

    manager.add_transaction_support(Box::new(AggregateTransactionPlugin::new(
        EntityType::AGGREGATE_COMPLETE,
        TimeSpan::from_milliseconds(0),
    )))?;

    if config.enable_bonded_aggregate_support {
        manager.add_transaction_support(Box::new(AggregateTransactionPlugin::new(
            EntityType::AGGREGATE_BONDED,
            config.max_bonded_transaction_lifetime,
        )))?;
    } else {
        debug!("[Aggregate] bonded aggregates are disabled");
    }

    manager.add_stateless_validator(BasicAggregateCosignaturesValidator::new(
        config.max_transactions,
        config.max_cosignatures_per_aggregate,
    ));

    Ok(())
}
