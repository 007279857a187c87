//! # cc-05-plugins
//!
//! Plugin subsystems and the manager that assembles them.
//!
//! ```text
//!                        PluginManager
//!   register_*_subsystem ─────┼──────────────────────────────────────────
//!     transaction plugins ──► TransactionRegistryBuilder ─► Arc<TransactionRegistry>
//!     sub-caches          ──► CatapultCacheBuilder       ─► CatapultCache
//!     validators          ──► Demux*ValidatorBuilder     ─► NotificationValidator
//!     observers           ──► DemuxObserverBuilder       ─► AggregateNotificationObserver
//!     resolvers           ──► Resolvers
//! ```
//!
//! | plugin     | entity types                 | sub-caches            |
//! |------------|------------------------------|-----------------------|
//! | core       | -                            | AccountStateCache     |
//! | transfer   | Transfer                     | -                     |
//! | mosaic     | -                            | MosaicCache (levies)  |
//! | namespace  | -                            | NamespaceCache        |
//! | multisig   | ModifyMultisigAccount        | MultisigCache         |
//! | aggregate  | AggregateComplete / Bonded   | -                     |
//! | lockhash   | HashLock                     | HashLockInfoCache     |
//!
//! The core subsystem is always registered; the others are enabled by name.

pub mod aggregate;
pub mod core;
pub mod errors;
pub mod lock;
pub mod manager;
pub mod mosaic;
pub mod multisig;
pub mod namespace;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use errors::PluginError;
pub use manager::{load_plugins, PluginBundle, PluginId, PluginManager};
