//! # Blockchain Configuration
//!
//! Network-wide settings read from the `[network]` section of a
//! [`ConfigurationBag`], plus typed access to `[plugin:<name>]` sections.

use serde::{Deserialize, Serialize};
use shared_types::{
    ConfigError, ConfigSectionReader, ConfigurationBag, MosaicId, NetworkIdentifier, TimeSpan,
};

/// Typed configuration of one plugin section.
pub trait PluginConfiguration: Sized {
    /// Section name, e.g. `plugin:aggregate`.
    const SECTION: &'static str;

    fn load(reader: &mut ConfigSectionReader<'_>) -> Result<Self, ConfigError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainConfiguration {
    pub network: NetworkIdentifier,
    pub currency_mosaic_id: MosaicId,
    pub max_transaction_lifetime: TimeSpan,
    pub max_transactions_per_block: u32,
    pub max_rollback_blocks: u32,
    /// Raw plugin sections, parsed on demand by [`Self::plugin_config`].
    pub plugins: ConfigurationBag,
}

impl Default for BlockchainConfiguration {
    fn default() -> Self {
        Self {
            network: NetworkIdentifier::MIJIN_TEST,
            currency_mosaic_id: MosaicId(0x0DC6_7FBE_1CAD_29E3),
            max_transaction_lifetime: TimeSpan::from_hours(24),
            max_transactions_per_block: 200,
            max_rollback_blocks: 40,
            plugins: ConfigurationBag::new(),
        }
    }
}

impl BlockchainConfiguration {
    pub const NETWORK_SECTION: &'static str = "network";

    /// Reads the `[network]` section strictly; other sections are kept for plugins.
    pub fn load(bag: ConfigurationBag) -> Result<Self, ConfigError> {
        let mut reader = bag.reader(Self::NETWORK_SECTION)?;
        let network = reader.get("identifier")?;
        let currency_mosaic_id = reader.get("currencyMosaicId")?;
        let max_transaction_lifetime = reader.get("maxTransactionLifetime")?;
        let max_transactions_per_block = reader.get("maxTransactionsPerBlock")?;
        let max_rollback_blocks = reader.get("maxRollbackBlocks")?;
        reader.finish()?;

        Ok(Self {
            network,
            currency_mosaic_id,
            max_transaction_lifetime,
            max_transactions_per_block,
            max_rollback_blocks,
            plugins: bag,
        })
    }

    /// Parses the section of `T`, rejecting unknown keys.
    pub fn plugin_config<T: PluginConfiguration>(&self) -> Result<T, ConfigError> {
        let mut reader = self.plugins.reader(T::SECTION)?;
        let config = T::load(&mut reader)?;
        reader.finish()?;
        Ok(config)
    }

    pub fn with_plugin_property(mut self, section: &str, key: &str, value: &str) -> Self {
        self.plugins.insert(section, key, value);
        self
    }
}
