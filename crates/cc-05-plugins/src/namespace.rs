//! # Namespace Plugin
//!
//! Namespaces can alias a mosaic or an address. Unresolved mosaic ids with
//! the namespace flag and alias addresses are mapped through this cache;
//! anything without a matching alias falls through to the next resolver.

use crate::errors::PluginError;
use crate::manager::PluginManager;
use cc_01_cache::{CacheDescriptor, ReadOnlyCatapultCache};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Key, MosaicId, NamespaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamespaceAlias {
    None,
    Mosaic(MosaicId),
    Address(Address),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub namespace_id: NamespaceId,
    pub owner: Key,
    pub alias: NamespaceAlias,
}

pub struct NamespaceCacheDescriptor;

impl CacheDescriptor for NamespaceCacheDescriptor {
    const NAME: &'static str = "NamespaceCache";
    type Key = NamespaceId;
    type Value = NamespaceEntry;

    fn key_of(value: &NamespaceEntry) -> NamespaceId {
        value.namespace_id
    }
}

fn find_alias(cache: ReadOnlyCatapultCache<'_>, namespace_id: NamespaceId) -> Option<NamespaceAlias> {
    cache
        .try_sub::<NamespaceCacheDescriptor>()
        .ok()?
        .find(&namespace_id)
        .map(|entry| entry.alias)
}

pub fn register_namespace_subsystem(manager: &mut PluginManager) -> Result<(), PluginError> {
    manager.add_cache::<NamespaceCacheDescriptor>()?;

    let resolvers = manager.resolvers_mut();
    resolvers.add_mosaic_id_resolver(|cache, mosaic_id| {
        match find_alias(cache, mosaic_id.namespace_id()?)? {
            NamespaceAlias::Mosaic(resolved) => Some(resolved),
            _ => None,
        }
    });
    resolvers.add_address_resolver(|cache, address| {
        match find_alias(cache, address.namespace_id()?)? {
            NamespaceAlias::Address(resolved) => Some(resolved),
            _ => None,
        }
    });

    Ok(())
}
