//! # Transfer Plugin
//!
//! Moves mosaics between accounts and carries an optional message. Balance
//! movement itself is handled by the core balance validators and observers;
//! this plugin only contributes the transaction layout and shape checks.

mod transaction;
mod validators;

pub use transaction::{TransferTransaction, TransferTransactionBody};
pub use validators::{
    create_transfer_message_validator, TransferMosaicsValidator, FAILURE_TRANSFER_MESSAGE_TOO_LARGE,
    FAILURE_TRANSFER_OUT_OF_ORDER_MOSAICS,
};

use crate::errors::PluginError;
use crate::manager::PluginManager;
use cc_02_model::{PluginConfiguration, TransactionPluginFactory, TransactionPluginFactoryOptions};
use shared_types::{ConfigError, ConfigSectionReader};

/// `[plugin:transfer]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfiguration {
    pub max_message_size: u16,
}

impl PluginConfiguration for TransferConfiguration {
    const SECTION: &'static str = "plugin:transfer";

    fn load(reader: &mut ConfigSectionReader<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            max_message_size: reader.get("maxMessageSize")?,
        })
    }
}

pub fn register_transfer_subsystem(manager: &mut PluginManager) -> Result<(), PluginError> {
    manager.add_transaction_support(TransactionPluginFactory::create(
        TransferTransactionBody,
        TransactionPluginFactoryOptions::Default,
    ))?;

    let message_validator = create_transfer_message_validator(manager.config());
    manager
        .add_stateless_validator(message_validator)
        .add_stateless_validator(TransferMosaicsValidator);

    Ok(())
}
