//! # Plugin Manager
//!
//! Collects what each plugin subsystem contributes and freezes it into a
//! [`PluginBundle`].
//!
//! Stateful validators are registered through hooks that run at `build()`
//! time, because some of them need the finished transaction registry.
//! Hooks run in registration order, so dispatch order is unaffected.

use crate::errors::PluginError;
use crate::{aggregate, core, lock, mosaic, multisig, namespace, transfer};
use cc_01_cache::{CacheDescriptor, CatapultCache, CatapultCacheBuilder};
use cc_02_model::{
    BlockchainConfiguration, Resolvers, TransactionPlugin, TransactionRegistry,
    TransactionRegistryBuilder, TypedNotification,
};
use cc_03_validators::{
    DemuxStatefulValidatorBuilder, DemuxStatelessValidatorBuilder, NotificationValidator,
    StatefulValidator, StatelessValidator,
};
use cc_04_observers::{AggregateNotificationObserver, DemuxObserverBuilder, NotificationObserver};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::info;

// =============================================================================
// PLUGIN IDENTIFIERS
// =============================================================================

/// Optional plugin subsystems, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluginId {
    Transfer,
    Mosaic,
    Namespace,
    Multisig,
    Aggregate,
    LockHash,
}

impl PluginId {
    pub const ALL: [PluginId; 6] = [
        PluginId::Transfer,
        PluginId::Mosaic,
        PluginId::Namespace,
        PluginId::Multisig,
        PluginId::Aggregate,
        PluginId::LockHash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PluginId::Transfer => "transfer",
            PluginId::Mosaic => "mosaic",
            PluginId::Namespace => "namespace",
            PluginId::Multisig => "multisig",
            PluginId::Aggregate => "aggregate",
            PluginId::LockHash => "lockhash",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Plugins that must be enabled alongside this one.
    pub fn dependencies(self) -> &'static [PluginId] {
        match self {
            PluginId::LockHash => &[PluginId::Aggregate],
            _ => &[],
        }
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// MANAGER
// =============================================================================

type StatefulValidatorHook =
    Box<dyn FnOnce(&Arc<TransactionRegistry>, &mut DemuxStatefulValidatorBuilder) + Send>;

pub struct PluginManager {
    config: BlockchainConfiguration,
    transactions: TransactionRegistryBuilder,
    caches: CatapultCacheBuilder,
    stateless_validators: DemuxStatelessValidatorBuilder,
    stateful_validators: Vec<StatefulValidatorHook>,
    observers: DemuxObserverBuilder,
    resolvers: Resolvers,
    plugins: Vec<PluginId>,
}

impl PluginManager {
    pub fn new(config: BlockchainConfiguration) -> Self {
        Self {
            config,
            transactions: TransactionRegistryBuilder::new(),
            caches: CatapultCache::builder(),
            stateless_validators: DemuxStatelessValidatorBuilder::new(),
            stateful_validators: Vec::new(),
            observers: DemuxObserverBuilder::new(),
            resolvers: Resolvers::new(),
            plugins: Vec::new(),
        }
    }

    pub fn config(&self) -> &BlockchainConfiguration {
        &self.config
    }

    pub fn add_transaction_support(&mut self, plugin: Box<dyn TransactionPlugin>) -> Result<&mut Self, PluginError> {
        self.transactions.register(plugin)?;
        Ok(self)
    }

    pub fn add_cache<D: CacheDescriptor>(&mut self) -> Result<&mut Self, PluginError> {
        self.caches.add::<D>()?;
        Ok(self)
    }

    pub fn add_stateless_validator<N, V>(&mut self, validator: V) -> &mut Self
    where
        N: TypedNotification,
        V: StatelessValidator<N> + 'static,
    {
        self.stateless_validators.add::<N, V>(validator);
        self
    }

    pub fn add_stateful_validator<N, V>(&mut self, validator: V) -> &mut Self
    where
        N: TypedNotification,
        V: StatefulValidator<N> + 'static,
    {
        self.add_stateful_validator_hook(move |_, builder| {
            builder.add::<N, V>(validator);
        })
    }

    /// Defers registration until the transaction registry is built.
    pub fn add_stateful_validator_hook(
        &mut self,
        hook: impl FnOnce(&Arc<TransactionRegistry>, &mut DemuxStatefulValidatorBuilder) + Send + 'static,
    ) -> &mut Self {
        self.stateful_validators.push(Box::new(hook));
        self
    }

    pub fn add_observer<N, O>(&mut self, observer: O) -> &mut Self
    where
        N: TypedNotification,
        O: NotificationObserver<N> + 'static,
    {
        self.observers.add::<N, O>(observer);
        self
    }

    pub fn resolvers_mut(&mut self) -> &mut Resolvers {
        &mut self.resolvers
    }

    /// Registers one optional subsystem.
    pub fn register(&mut self, plugin: PluginId) -> Result<&mut Self, PluginError> {
        if self.plugins.contains(&plugin) {
            return Ok(self);
        }

        for dependency in plugin.dependencies() {
            if !self.plugins.contains(dependency) {
                return Err(PluginError::MissingDependency {
                    plugin: plugin.name(),
                    dependency: dependency.name(),
                });
            }
        }

        info!("[PluginManager] Registering plugin: {}", plugin);
        match plugin {
            PluginId::Transfer => transfer::register_transfer_subsystem(self)?,
            PluginId::Mosaic => mosaic::register_mosaic_subsystem(self)?,
            PluginId::Namespace => namespace::register_namespace_subsystem(self)?,
            PluginId::Multisig => multisig::register_multisig_subsystem(self)?,
            PluginId::Aggregate => aggregate::register_aggregate_subsystem(self)?,
            PluginId::LockHash => lock::register_lock_hash_subsystem(self)?,
        }

        self.plugins.push(plugin);
        Ok(self)
    }

    pub fn plugins(&self) -> &[PluginId] {
        &self.plugins
    }

    pub fn build(self) -> PluginBundle {
        let registry = Arc::new(self.transactions.build());

        let mut stateful_validators = DemuxStatefulValidatorBuilder::new();
        for hook in self.stateful_validators {
            hook(&registry, &mut stateful_validators);
        }

        let validator = NotificationValidator::new(self.stateless_validators.build(), stateful_validators.build());
        info!(
            "[PluginManager] Built {} stateless validators, {} stateful validators",
            validator.stateless().names().len(),
            validator.stateful().names().len()
        );

        PluginBundle {
            config: Arc::new(self.config),
            registry,
            validator: Arc::new(validator),
            observer: Arc::new(self.observers.build()),
            resolvers: Arc::new(self.resolvers),
            cache: self.caches.build(),
            plugins: self.plugins,
        }
    }
}

/// Everything the pipeline needs, frozen after startup.
pub struct PluginBundle {
    pub config: Arc<BlockchainConfiguration>,
    pub registry: Arc<TransactionRegistry>,
    pub validator: Arc<NotificationValidator>,
    pub observer: Arc<AggregateNotificationObserver>,
    pub resolvers: Arc<Resolvers>,
    pub cache: CatapultCache,
    pub plugins: Vec<PluginId>,
}

/// Registers the core subsystem plus every named plugin.
///
/// Plugins are registered in [`PluginId`] order regardless of the order of
/// `names`, so resolver precedence does not depend on configuration order.
pub fn load_plugins<S: AsRef<str>>(
    config: BlockchainConfiguration,
    names: &[S],
) -> Result<PluginBundle, PluginError> {
    let mut enabled = BTreeSet::new();
    for name in names {
        let name = name.as_ref();
        let plugin = PluginId::from_name(name).ok_or_else(|| PluginError::UnknownPlugin {
            name: name.to_string(),
        })?;
        enabled.insert(plugin);
    }

    let mut manager = PluginManager::new(config);
    core::register_core_subsystem(&mut manager)?;
    for plugin in enabled {
        manager.register(plugin)?;
    }

    Ok(manager.build())
}
