//! # Transaction Registry
//!
//! Dispatch table `EntityType -> plugin`, built once at startup and frozen.

use crate::errors::{DecodeError, RegistryError};
use crate::plugin::{EmbeddedTransactionPlugin, TransactionPlugin};
use crate::transaction::Transaction;
use shared_types::EntityType;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

#[derive(Default)]
pub struct TransactionRegistryBuilder {
    plugins: BTreeMap<EntityType, Box<dyn TransactionPlugin>>,
}

impl TransactionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn TransactionPlugin>) -> Result<&mut Self, RegistryError> {
        let entity_type = plugin.transaction_type();
        if self.plugins.contains_key(&entity_type) {
            return Err(RegistryError::DuplicatePlugin { entity_type });
        }

        self.plugins.insert(entity_type, plugin);
        Ok(self)
    }

    pub fn build(self) -> TransactionRegistry {
        info!("[Registry] Registered {} transaction plugins", self.plugins.len());
        TransactionRegistry {
            plugins: self.plugins,
        }
    }
}

/// Immutable plugin lookup, shared through `Arc`.
pub struct TransactionRegistry {
    plugins: BTreeMap<EntityType, Box<dyn TransactionPlugin>>,
}

impl TransactionRegistry {
    pub fn find(&self, entity_type: EntityType) -> Option<&dyn TransactionPlugin> {
        self.plugins.get(&entity_type).map(Box::as_ref)
    }

    pub fn find_embedded(&self, entity_type: EntityType) -> Option<&dyn EmbeddedTransactionPlugin> {
        self.find(entity_type)?.embedded_plugin()
    }

    /// Plugin for a top-level transaction whose real size matches its declared size.
    pub fn find_top_level(&self, transaction: &Transaction<'_>) -> Result<&dyn TransactionPlugin, DecodeError> {
        let entity_type = transaction.header.entity_type;
        let plugin = self
            .find(entity_type)
            .ok_or(DecodeError::UnknownType { entity_type })?;

        if !plugin.supports_top_level() {
            return Err(DecodeError::NotTopLevel { entity_type });
        }

        let real = plugin.calculate_real_size(transaction, self);
        if real != u64::from(transaction.header.size) {
            return Err(DecodeError::RealSizeMismatch {
                declared: transaction.header.size,
                real,
            });
        }

        Ok(plugin)
    }

    pub fn types(&self) -> impl Iterator<Item = EntityType> + '_ {
        self.plugins.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for TransactionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionRegistry")
            .field("types", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}
