use super::{MultisigCacheDescriptor, MultisigEntry};
use cc_01_cache::BasicCacheDelta;
use cc_02_model::{CosignatoryModificationType, ModifyMultisigCosignersNotification, ModifyMultisigSettingsNotification};
use cc_04_observers::utils::should_link;
use cc_04_observers::{NotificationObserver, NotifyMode, ObserverContext, ObserverError};
use shared_types::Key;

fn multisig_mut<'c>(
    context: &'c mut ObserverContext<'_>,
) -> Result<&'c mut BasicCacheDelta<MultisigCacheDescriptor>, ObserverError> {
    Ok(context.cache.try_sub_mut::<MultisigCacheDescriptor>()?)
}

fn entry_or_new(multisig: &BasicCacheDelta<MultisigCacheDescriptor>, key: &Key) -> MultisigEntry {
    multisig.find(key).cloned().unwrap_or_else(|| MultisigEntry::new(*key))
}

/// Stores `entry`, or drops it when it no longer carries anything.
fn store(multisig: &mut BasicCacheDelta<MultisigCacheDescriptor>, entry: MultisigEntry) -> Result<(), ObserverError> {
    if !entry.is_empty() {
        multisig.set(entry);
    } else if multisig.contains(&entry.key) {
        multisig.remove(&entry.key)?;
    }

    Ok(())
}

/// Links and unlinks cosignatories in both directions of the multisig graph.
#[derive(Debug, Clone, Default)]
pub struct ModifyMultisigCosignersObserver;

impl NotificationObserver<ModifyMultisigCosignersNotification> for ModifyMultisigCosignersObserver {
    fn name(&self) -> &str {
        "ModifyMultisigCosignersObserver"
    }

    fn notify(
        &self,
        notification: &ModifyMultisigCosignersNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let mode = context.mode;
        let multisig = multisig_mut(context)?;
        let account_key = notification.signer;

        for modification in &notification.modifications {
            let cosignatory_key = modification.cosignatory_key;
            let mut account = entry_or_new(multisig, &account_key);
            let mut cosignatory = entry_or_new(multisig, &cosignatory_key);

            if should_link(modification.modification_type, CosignatoryModificationType::Add, mode) {
                account.cosignatories.insert(cosignatory_key);
                cosignatory.multisig_accounts.insert(account_key);
            } else {
                account.cosignatories.remove(&cosignatory_key);
                cosignatory.multisig_accounts.remove(&account_key);
            }

            store(multisig, account)?;
            store(multisig, cosignatory)?;
        }

        Ok(())
    }
}

/// Applies threshold deltas to the multisig entry.
#[derive(Debug, Clone, Default)]
pub struct ModifyMultisigSettingsObserver;

impl ModifyMultisigSettingsObserver {
    fn apply(&self, current: u8, delta: i8, direction: i16) -> Result<u8, ObserverError> {
        let updated = i16::from(current) + direction * i16::from(delta);
        u8::try_from(updated).map_err(|_| ObserverError::Violation {
            observer: self.name().to_string(),
            reason: format!("threshold {current} cannot change by {delta}"),
        })
    }
}

impl NotificationObserver<ModifyMultisigSettingsNotification> for ModifyMultisigSettingsObserver {
    fn name(&self) -> &str {
        "ModifyMultisigSettingsObserver"
    }

    fn notify(
        &self,
        notification: &ModifyMultisigSettingsNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let direction = match context.mode {
            NotifyMode::Commit => 1,
            NotifyMode::Rollback => -1,
        };
        let multisig = multisig_mut(context)?;

        // accounts without cosignatories only ever get zero deltas
        let mut entry = match multisig.find(&notification.signer) {
            Some(entry) => entry.clone(),
            None if direction > 0 => return Ok(()),
            None => MultisigEntry::new(notification.signer),
        };

        entry.min_removal = self.apply(entry.min_removal, notification.min_removal_delta, direction)?;
        entry.min_approval = self.apply(entry.min_approval, notification.min_approval_delta, direction)?;
        store(multisig, entry)
    }
}
