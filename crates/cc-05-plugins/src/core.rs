//! Core subsystem: account state, the type-independent validators and the
//! observers that move balances and track accounts.

use crate::errors::PluginError;
use crate::manager::PluginManager;
use cc_01_cache::AccountStateCacheDescriptor;
use cc_03_validators::core::{
    AddressValidator, BalanceDebitValidator, BalanceTransferValidator, DeadlineValidator,
    EntityVersionValidator, MaxTransactionsValidator, NetworkValidator, SignatureValidator,
    TransactionFeeValidator,
};
use cc_04_observers::core::{
    AccountAddressObserver, AccountPublicKeyObserver, BalanceDebitObserver, BalanceTransferObserver,
    SourceChangeObserver,
};
use std::sync::Arc;

pub fn register_core_subsystem(manager: &mut PluginManager) -> Result<(), PluginError> {
    let network = manager.config().network;
    let max_transactions = manager.config().max_transactions_per_block;

    manager.add_cache::<AccountStateCacheDescriptor>()?;

    manager
        .add_stateless_validator(NetworkValidator::new(network))
        .add_stateless_validator(AddressValidator::new(network))
        .add_stateless_validator(TransactionFeeValidator)
        .add_stateless_validator(SignatureValidator)
        .add_stateless_validator(MaxTransactionsValidator::new(max_transactions));

    manager
        .add_stateful_validator_hook(|registry, builder| {
            builder.add(EntityVersionValidator::new(Arc::clone(registry)));
        })
        .add_stateful_validator(DeadlineValidator)
        .add_stateful_validator(BalanceTransferValidator)
        .add_stateful_validator(BalanceDebitValidator);

    manager
        .add_observer(SourceChangeObserver)
        .add_observer(AccountPublicKeyObserver)
        .add_observer(AccountAddressObserver)
        .add_observer(BalanceTransferObserver)
        .add_observer(BalanceDebitObserver);

    Ok(())
}
