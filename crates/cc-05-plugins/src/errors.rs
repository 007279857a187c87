use cc_01_cache::CacheError;
use cc_02_model::RegistryError;
use shared_types::ConfigError;
use thiserror::Error;

/// Startup errors raised while plugins are registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("Unknown plugin: {name}")]
    UnknownPlugin { name: String },

    #[error("Plugin {plugin} requires plugin {dependency}")]
    MissingDependency {
        plugin: &'static str,
        dependency: &'static str,
    },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
