//! # Transaction Plugins
//!
//! One plugin per entity type turns a transaction layout into notifications.
//! Most transaction types only need a [`TransactionBody`]; the
//! [`TransactionPluginFactory`] derives both the top-level and the embedded
//! plugin from it. Types with non-standard layouts (aggregates) implement
//! [`TransactionPlugin`] directly.

use crate::config::BlockchainConfiguration;
use crate::registry::TransactionRegistry;
use crate::subscriber::NotificationSubscriber;
use crate::transaction::{
    EmbeddedTransaction, Transaction, TransactionView, EMBEDDED_TRANSACTION_HEADER_SIZE,
    TRANSACTION_HEADER_SIZE,
};
use shared_types::{entity_version_of, CodecError, EntityType, Hash256, Height, Key, TimeSpan};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Version range and lifetime accepted for a transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionAttributes {
    pub min_version: u32,
    pub max_version: u32,
    /// Zero means the network default lifetime.
    pub max_lifetime: TimeSpan,
}

impl TransactionAttributes {
    pub fn supports(&self, entity_version: u32) -> bool {
        (self.min_version..=self.max_version).contains(&entity_version)
    }
}

/// A top-level transaction being published.
#[derive(Debug, Clone, Copy)]
pub struct TransactionInfo<'a> {
    pub transaction: &'a Transaction<'a>,
    pub hash: Hash256,
    pub associated_height: Height,
}

/// An embedded transaction being published.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedTransactionInfo<'a> {
    pub transaction: &'a EmbeddedTransaction,
    pub associated_height: Height,
}

/// Plugin for a top-level transaction type.
pub trait TransactionPlugin: Send + Sync {
    fn transaction_type(&self) -> EntityType;

    fn attributes(&self, height: Height) -> TransactionAttributes;

    /// Size implied by the layout's own counts, or `u64::MAX` when the layout is invalid.
    fn calculate_real_size(&self, transaction: &Transaction<'_>, registry: &TransactionRegistry) -> u64;

    /// Part of the buffer covered by the transaction hash and signature.
    fn data_buffer<'t>(&self, transaction: &Transaction<'t>) -> &'t [u8] {
        transaction.data_buffer()
    }

    /// Publishes the type-specific notifications.
    fn publish(
        &self,
        info: &TransactionInfo<'_>,
        registry: &TransactionRegistry,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError>;

    fn supports_top_level(&self) -> bool {
        true
    }

    fn embedded_plugin(&self) -> Option<&dyn EmbeddedTransactionPlugin> {
        None
    }
}

/// Plugin for a transaction type embedded in aggregates.
pub trait EmbeddedTransactionPlugin: Send + Sync {
    fn transaction_type(&self) -> EntityType;

    fn attributes(&self, height: Height) -> TransactionAttributes;

    fn calculate_real_size(&self, transaction: &EmbeddedTransaction) -> u64;

    fn publish(
        &self,
        info: &EmbeddedTransactionInfo<'_>,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError>;

    /// Keys that must cosign besides the embedded signer.
    fn additional_required_cosigners(
        &self,
        transaction: &EmbeddedTransaction,
        config: &BlockchainConfiguration,
    ) -> BTreeSet<Key>;
}

/// Hash of `transaction` over the data buffer chosen by `plugin`.
pub fn calculate_hash(plugin: &dyn TransactionPlugin, transaction: &Transaction<'_>) -> Hash256 {
    crate::transaction::transaction_hash(transaction, plugin.data_buffer(transaction))
}

// =============================================================================
// BODY-BASED PLUGINS
// =============================================================================

/// Layout and notifications of one transaction type, independent of header kind.
pub trait TransactionBody: Send + Sync + 'static {
    const ENTITY_TYPE: EntityType;
    const MIN_VERSION: u32 = 1;
    const MAX_VERSION: u32 = 1;

    fn max_lifetime(&self) -> TimeSpan {
        TimeSpan::from_milliseconds(0)
    }

    /// Payload size implied by the payload's counts, `None` when truncated.
    fn payload_size(&self, payload: &[u8]) -> Option<u64>;

    fn publish(
        &self,
        transaction: &TransactionView<'_>,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError>;

    fn additional_required_cosigners(
        &self,
        _transaction: &TransactionView<'_>,
        _config: &BlockchainConfiguration,
    ) -> BTreeSet<Key> {
        BTreeSet::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionPluginFactoryOptions {
    #[default]
    Default,
    /// The type may only appear inside aggregates.
    OnlyEmbeddable,
}

/// Derives both plugin flavours from a [`TransactionBody`].
pub struct TransactionPluginFactory;

impl TransactionPluginFactory {
    pub fn create<B: TransactionBody>(
        body: B,
        options: TransactionPluginFactoryOptions,
    ) -> Box<dyn TransactionPlugin> {
        let body = Arc::new(body);
        Box::new(BodyTransactionPlugin {
            body: body.clone(),
            embedded: BodyEmbeddedTransactionPlugin { body },
            options,
        })
    }
}

fn body_attributes<B: TransactionBody>(body: &B) -> TransactionAttributes {
    TransactionAttributes {
        min_version: B::MIN_VERSION,
        max_version: B::MAX_VERSION,
        max_lifetime: body.max_lifetime(),
    }
}

fn publish_body<B: TransactionBody>(
    body: &B,
    transaction: &TransactionView<'_>,
    sub: &mut dyn NotificationSubscriber,
) -> Result<(), CodecError> {
    let version = entity_version_of(transaction.version);
    if !body_attributes(body).supports(version) {
        debug!(
            "[Plugin] Skipping {} with unsupported version {}",
            B::ENTITY_TYPE,
            version
        );
        return Ok(());
    }

    body.publish(transaction, sub)
}

fn real_size<B: TransactionBody>(body: &B, header_size: usize, payload: &[u8]) -> u64 {
    body.payload_size(payload)
        .and_then(|size| size.checked_add(header_size as u64))
        .unwrap_or(u64::MAX)
}

struct BodyTransactionPlugin<B: TransactionBody> {
    body: Arc<B>,
    embedded: BodyEmbeddedTransactionPlugin<B>,
    options: TransactionPluginFactoryOptions,
}

impl<B: TransactionBody> TransactionPlugin for BodyTransactionPlugin<B> {
    fn transaction_type(&self) -> EntityType {
        B::ENTITY_TYPE
    }

    fn attributes(&self, _height: Height) -> TransactionAttributes {
        body_attributes(self.body.as_ref())
    }

    fn calculate_real_size(&self, transaction: &Transaction<'_>, _registry: &TransactionRegistry) -> u64 {
        real_size(self.body.as_ref(), TRANSACTION_HEADER_SIZE, transaction.payload)
    }

    fn publish(
        &self,
        info: &TransactionInfo<'_>,
        _registry: &TransactionRegistry,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError> {
        publish_body(self.body.as_ref(), &info.transaction.view(), sub)
    }

    fn supports_top_level(&self) -> bool {
        self.options != TransactionPluginFactoryOptions::OnlyEmbeddable
    }

    fn embedded_plugin(&self) -> Option<&dyn EmbeddedTransactionPlugin> {
        Some(&self.embedded)
    }
}

struct BodyEmbeddedTransactionPlugin<B: TransactionBody> {
    body: Arc<B>,
}

impl<B: TransactionBody> EmbeddedTransactionPlugin for BodyEmbeddedTransactionPlugin<B> {
    fn transaction_type(&self) -> EntityType {
        B::ENTITY_TYPE
    }

    fn attributes(&self, _height: Height) -> TransactionAttributes {
        body_attributes(self.body.as_ref())
    }

    fn calculate_real_size(&self, transaction: &EmbeddedTransaction) -> u64 {
        real_size(self.body.as_ref(), EMBEDDED_TRANSACTION_HEADER_SIZE, &transaction.payload)
    }

    fn publish(
        &self,
        info: &EmbeddedTransactionInfo<'_>,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError> {
        publish_body(self.body.as_ref(), &info.transaction.view(), sub)
    }

    fn additional_required_cosigners(
        &self,
        transaction: &EmbeddedTransaction,
        config: &BlockchainConfiguration,
    ) -> BTreeSet<Key> {
        self.body
            .additional_required_cosigners(&transaction.view(), config)
    }
}
