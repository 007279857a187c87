//! Fixtures shared by plugin tests.

use cc_01_cache::{AccountStateCacheDescriptor, CacheDescriptor, CatapultCache, CatapultCacheDelta};
use cc_02_model::{
    BlockchainConfiguration, CollectingSubscriber, Mempool, Notification, ResolverContext, Resolvers,
    TransactionPlugin, TransactionRegistry, TransactionRegistryBuilder, EmbeddedTransactionInfo,
};
use cc_03_validators::ValidatorContext;
use cc_04_observers::{NotifyMode, ObserverContext, ObserverState};
use shared_types::{Amount, Height, Key, MosaicId, NetworkIdentifier, Timestamp};

pub const NETWORK: NetworkIdentifier = NetworkIdentifier::MIJIN_TEST;

/// Network configuration with every plugin section present.
pub fn full_config() -> BlockchainConfiguration {
    BlockchainConfiguration::default()
        .with_plugin_property("plugin:transfer", "maxMessageSize", "1024")
        .with_plugin_property("plugin:multisig", "maxMultisigDepth", "3")
        .with_plugin_property("plugin:multisig", "maxCosignersPerAccount", "10")
        .with_plugin_property("plugin:multisig", "maxCosignedAccountsPerAccount", "5")
        .with_plugin_property("plugin:multisig", "newCosignersMustApprove", "true")
        .with_plugin_property("plugin:aggregate", "maxTransactions", "100")
        .with_plugin_property("plugin:aggregate", "maxCosignaturesPerAggregate", "15")
        .with_plugin_property("plugin:aggregate", "enableStrictCosignatureCheck", "false")
        .with_plugin_property("plugin:aggregate", "enableBondedAggregateSupport", "true")
        .with_plugin_property("plugin:lockhash", "lockedFundsPerAggregate", "10'000'000")
        .with_plugin_property("plugin:lockhash", "maxHashLockDuration", "1'000")
}

/// Owns a cache and everything the validator and observer contexts borrow.
pub struct PluginFixture {
    pub cache: CatapultCache,
    pub config: BlockchainConfiguration,
    pub resolvers: Resolvers,
    pub mempool: Mempool,
    pub state: ObserverState,
}

impl PluginFixture {
    /// Fixture with the account cache plus the sub-cache `D`.
    pub fn with_cache<D: CacheDescriptor>() -> Self {
        let mut builder = CatapultCache::builder();
        builder
            .add::<AccountStateCacheDescriptor>()
            .expect("account cache registers");
        builder.add::<D>().expect("plugin cache registers");
        Self::from_cache(builder.build())
    }

    pub fn from_cache(cache: CatapultCache) -> Self {
        Self {
            cache,
            config: full_config(),
            resolvers: Resolvers::new(),
            mempool: Mempool::new(),
            state: ObserverState::new(),
        }
    }

    /// Applies `setup` to a delta and commits it at height 1.
    pub fn seed(&self, setup: impl FnOnce(&mut CatapultCacheDelta)) {
        let mut delta = self.cache.create_delta().expect("no outstanding delta");
        setup(&mut delta);
        self.cache.commit(delta, Height(1)).expect("seed commits");
    }

    /// Runs `action` with a validator context over the committed state.
    pub fn validate<R>(&self, height: Height, action: impl FnOnce(&ValidatorContext<'_>) -> R) -> R {
        let view = self.cache.create_view();
        let resolver_context = ResolverContext::new(&self.resolvers, &self.mempool);
        let context = ValidatorContext::new(
            height,
            Timestamp(0),
            &self.config,
            view.as_read_only(),
            &resolver_context,
        );
        action(&context)
    }

    /// Runs `action` with an observer context over `delta`.
    pub fn observe<R>(
        &mut self,
        delta: &mut CatapultCacheDelta,
        height: Height,
        mode: NotifyMode,
        action: impl FnOnce(&mut ObserverContext<'_>) -> R,
    ) -> R {
        let resolver_context = ResolverContext::new(&self.resolvers, &self.mempool);
        let mut context = ObserverContext::new(
            delta,
            height,
            mode,
            &self.config,
            &resolver_context,
            &mut self.state,
        );
        action(&mut context)
    }
}

/// Credits `amount` of `mosaic_id` to the account of `key`, creating it.
pub fn fund(delta: &mut CatapultCacheDelta, key: &Key, mosaic_id: MosaicId, amount: Amount) {
    let accounts = delta.sub_mut::<AccountStateCacheDescriptor>();
    accounts.add_account_with_key(*key, NETWORK, Height(1));
    let address = shared_types::public_key_to_address(key, NETWORK);
    accounts
        .find_mut(&address)
        .expect("account was added")
        .balances
        .credit(mosaic_id, amount)
        .expect("credit fits");
}

pub fn registry_with(plugins: Vec<Box<dyn TransactionPlugin>>) -> TransactionRegistry {
    let mut builder = TransactionRegistryBuilder::new();
    for plugin in plugins {
        builder.register(plugin).expect("unique plugin types");
    }
    builder.build()
}

/// Notifications published by the embedded flavour of `plugin`.
pub fn publish_embedded(
    plugin: &dyn TransactionPlugin,
    transaction: &cc_02_model::EmbeddedTransaction,
) -> (Vec<Notification>, Mempool) {
    let mut sub = CollectingSubscriber::new();
    plugin
        .embedded_plugin()
        .expect("plugin is embeddable")
        .publish(
            &EmbeddedTransactionInfo {
                transaction,
                associated_height: Height(1),
            },
            &mut sub,
        )
        .expect("publish succeeds");
    sub.into_parts()
}

pub fn key(byte: u8) -> Key {
    Key([byte; 32])
}
