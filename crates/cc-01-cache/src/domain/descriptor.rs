use serde::Serialize;
use std::fmt::Debug;

/// Static description of one sub-cache: its name, key and value types.
///
/// The descriptor type itself is the lookup key inside the catapult cache,
/// so every sub-cache needs its own descriptor.
pub trait CacheDescriptor: Send + Sync + 'static {
    /// Human readable name used in logs and errors.
    const NAME: &'static str;

    type Key: Ord + Clone + Debug + Serialize + Send + Sync + 'static;
    type Value: Clone + Debug + PartialEq + Serialize + Send + Sync + 'static;

    /// Extracts the key under which `value` is stored.
    fn key_of(value: &Self::Value) -> Self::Key;
}
