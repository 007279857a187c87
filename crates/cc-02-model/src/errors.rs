//! Error types for decoding and registry construction.

use shared_types::{CodecError, EntityType};
use thiserror::Error;

/// Registry construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Plugin already registered for entity type {entity_type}")]
    DuplicatePlugin { entity_type: EntityType },
}

/// Transaction rejected before any notification is published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Transaction buffer too small: {size} bytes")]
    TooSmall { size: usize },

    #[error("Declared size {declared} does not match buffer size {actual}")]
    BufferSizeMismatch { declared: u32, actual: usize },

    #[error("Declared size {declared} does not match real size {real}")]
    RealSizeMismatch { declared: u32, real: u64 },

    #[error("No plugin registered for entity type {entity_type}")]
    UnknownType { entity_type: EntityType },

    #[error("Entity type {entity_type} is not allowed at top level")]
    NotTopLevel { entity_type: EntityType },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Deferred amount that cannot be resolved in the current pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Deferred amount descriptor {reference} is not available in this pass")]
    MissingDescriptor { reference: String },
}
