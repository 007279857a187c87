//! # Multisig Plugin
//!
//! Turns accounts into multisig accounts controlled by cosignatories, and
//! decides which cosignatures an aggregate may carry.
//!
//! ## Cache Graph
//!
//! ```text
//!   multisig account ──cosignatories──► cosignatory
//!        ▲                                  │
//!        └──────── multisig_accounts ───────┘
//! ```
//!
//! Both directions are stored so depth and loop checks can walk up and down.
//! An entry that links nothing and has zero thresholds is removed.

mod eligibility;
mod observers;
mod transaction;
mod validators;

pub use eligibility::{find_eligible_cosigners, MultisigAggregateEligibleCosignersValidator};
pub use observers::{ModifyMultisigCosignersObserver, ModifyMultisigSettingsObserver};
pub use transaction::{ModifyMultisigAccountTransaction, ModifyMultisigAccountTransactionBody};
pub use validators::*;

use crate::errors::PluginError;
use crate::manager::PluginManager;
use cc_01_cache::CacheDescriptor;
use cc_02_model::{PluginConfiguration, TransactionPluginFactory, TransactionPluginFactoryOptions};
use serde::{Deserialize, Serialize};
use shared_types::{ConfigError, ConfigSectionReader, Key};
use std::collections::BTreeSet;
use std::sync::Arc;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// `[plugin:multisig]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigConfiguration {
    pub max_multisig_depth: u8,
    pub max_cosigners_per_account: u8,
    pub max_cosigned_accounts_per_account: u8,
    pub new_cosigners_must_approve: bool,
}

impl PluginConfiguration for MultisigConfiguration {
    const SECTION: &'static str = "plugin:multisig";

    fn load(reader: &mut ConfigSectionReader<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            max_multisig_depth: reader.get("maxMultisigDepth")?,
            max_cosigners_per_account: reader.get("maxCosignersPerAccount")?,
            max_cosigned_accounts_per_account: reader.get("maxCosignedAccountsPerAccount")?,
            new_cosigners_must_approve: reader.get_or("newCosignersMustApprove", true)?,
        })
    }
}

// =============================================================================
// CACHE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigEntry {
    pub key: Key,
    pub min_approval: u8,
    pub min_removal: u8,
    pub cosignatories: BTreeSet<Key>,
    /// Accounts this key cosigns for.
    pub multisig_accounts: BTreeSet<Key>,
}

impl MultisigEntry {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            min_approval: 0,
            min_removal: 0,
            cosignatories: BTreeSet::new(),
            multisig_accounts: BTreeSet::new(),
        }
    }

    /// True when the entry carries no information and can be dropped.
    pub fn is_empty(&self) -> bool {
        self.cosignatories.is_empty()
            && self.multisig_accounts.is_empty()
            && self.min_approval == 0
            && self.min_removal == 0
    }
}

pub struct MultisigCacheDescriptor;

impl CacheDescriptor for MultisigCacheDescriptor {
    const NAME: &'static str = "MultisigCache";
    type Key = Key;
    type Value = MultisigEntry;

    fn key_of(value: &MultisigEntry) -> Key {
        value.key
    }
}

// =============================================================================
// REGISTRATION
// =============================================================================

pub fn register_multisig_subsystem(manager: &mut PluginManager) -> Result<(), PluginError> {
    manager
        .add_transaction_support(TransactionPluginFactory::create(
            ModifyMultisigAccountTransactionBody,
            TransactionPluginFactoryOptions::OnlyEmbeddable,
        ))?
        .add_cache::<MultisigCacheDescriptor>()?;

    let config = manager.config().clone();
    manager.add_stateless_validator(ModifyMultisigRedundantModificationsValidator);

    manager
        .add_stateful_validator(ModifyMultisigInvalidCosignersValidator)
        .add_stateful_validator(ModifyMultisigInvalidSettingsValidator)
        .add_stateful_validator(create_max_cosigners_validator(&config))
        .add_stateful_validator(create_max_cosigned_accounts_validator(&config))
        .add_stateful_validator(create_loop_and_level_validator(&config))
        .add_stateful_validator_hook(|registry, builder| {
            builder.add(MultisigAggregateEligibleCosignersValidator::new(Arc::clone(registry)));
        });

    manager
        .add_observer(ModifyMultisigCosignersObserver)
        .add_observer(ModifyMultisigSettingsObserver);

    Ok(())
}
