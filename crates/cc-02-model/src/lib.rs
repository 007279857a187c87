//! # cc-02-model
//!
//! The notification model every plugin, validator and observer builds on.
//!
//! ## Flow
//!
//! ```text
//! bytes ──► Transaction::parse ──► TransactionRegistry::find(type)
//!                                        │
//!                  NotificationPublisher::publish (basic + plugin)
//!                                        │
//!                          NotificationSubscriber (owns Mempool)
//! ```
//!
//! Notifications own copies of the fields they carry, so a recorded
//! notification list stays valid after the transaction buffer is gone.

pub mod amounts;
pub mod config;
pub mod errors;
pub mod mempool;
pub mod notifications;
pub mod plugin;
pub mod publisher;
pub mod receipts;
pub mod registry;
pub mod resolver;
pub mod subscriber;
pub mod transaction;

pub use amounts::*;
pub use config::{BlockchainConfiguration, PluginConfiguration};
pub use errors::*;
pub use mempool::{Mempool, MempoolRef};
pub use notifications::*;
pub use plugin::*;
pub use publisher::{NotificationPublisher, PublicationMode};
pub use receipts::*;
pub use registry::{TransactionRegistry, TransactionRegistryBuilder};
pub use resolver::{ResolverContext, Resolvers};
pub use subscriber::{CollectingSubscriber, NotificationSubscriber};
pub use transaction::*;
