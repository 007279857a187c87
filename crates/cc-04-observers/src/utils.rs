//! Helpers shared by observers.

use crate::context::ObserverContext;
use crate::errors::ObserverError;
use crate::observer::NotifyMode;
use shared_types::{Address, Amount, BlockDuration, Height, MosaicId};

/// True when a link between two entities should be created.
///
/// Commit links on `Add`, Rollback links on the inverse action.
pub fn should_link<T: PartialEq>(action: T, add: T, mode: NotifyMode) -> bool {
    (action == add) == (mode == NotifyMode::Commit)
}

/// True at heights where expired state is pruned, every `interval` blocks.
///
/// Holds in both modes: the Rollback of a pruning block restores what its
/// Commit removed.
pub fn should_prune(context: &ObserverContext<'_>, interval: u64) -> bool {
    interval != 0 && context.height.0 % interval == 0
}

/// Height at which state created at `height` with `duration` expires.
///
/// Saturates instead of overflowing for very long durations.
pub fn expiry_height(height: Height, duration: BlockDuration) -> Height {
    height.checked_add(duration).unwrap_or(Height(u64::MAX))
}

/// Moves `amount` of `mosaic_id` between two existing accounts.
pub fn transfer_balance(
    context: &mut ObserverContext<'_>,
    from: Address,
    to: Address,
    mosaic_id: MosaicId,
    amount: Amount,
) -> Result<(), ObserverError> {
    if amount.is_zero() {
        return Ok(());
    }

    debit_balance(context, from, mosaic_id, amount)?;
    credit_balance(context, to, mosaic_id, amount)
}

pub fn credit_balance(
    context: &mut ObserverContext<'_>,
    address: Address,
    mosaic_id: MosaicId,
    amount: Amount,
) -> Result<(), ObserverError> {
    if amount.is_zero() {
        return Ok(());
    }

    let account = context
        .accounts_mut()?
        .find_mut(&address)
        .ok_or(ObserverError::MissingAccount { address })?;
    Ok(account.balances.credit(mosaic_id, amount)?)
}

pub fn debit_balance(
    context: &mut ObserverContext<'_>,
    address: Address,
    mosaic_id: MosaicId,
    amount: Amount,
) -> Result<(), ObserverError> {
    if amount.is_zero() {
        return Ok(());
    }

    let account = context
        .accounts_mut()?
        .find_mut(&address)
        .ok_or(ObserverError::MissingAccount { address })?;
    Ok(account.balances.debit(mosaic_id, amount)?)
}
