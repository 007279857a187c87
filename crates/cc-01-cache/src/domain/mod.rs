//! Domain types of the cache: descriptors, errors and the core account state.

pub mod account_state;
pub mod descriptor;
pub mod errors;

pub use account_state::*;
pub use descriptor::CacheDescriptor;
pub use errors::*;
