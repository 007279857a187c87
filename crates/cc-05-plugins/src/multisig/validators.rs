use super::{MultisigCacheDescriptor, MultisigConfiguration, MultisigEntry};
use cc_01_cache::ReadOnlySubCache;
use cc_02_model::{
    BlockchainConfiguration, CosignatoryModificationType, ModifyMultisigCosignersNotification,
    ModifyMultisigNewCosignerNotification, ModifyMultisigSettingsNotification,
};
use cc_03_validators::{stateful, Configured, StatefulValidator, StatelessValidator, ValidatorContext};
use shared_types::{facility, Key, ValidationResult};
use std::collections::BTreeSet;

pub const FAILURE_MULTISIG_MODIFY_REDUNDANT_MODIFICATIONS: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 1);
pub const FAILURE_MULTISIG_MODIFY_UNKNOWN_MULTISIG_ACCOUNT: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 2);
pub const FAILURE_MULTISIG_MODIFY_ALREADY_A_COSIGNER: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 3);
pub const FAILURE_MULTISIG_MODIFY_NOT_A_COSIGNER: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 4);
pub const FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 5);
pub const FAILURE_MULTISIG_MODIFY_MIN_SETTING_LARGER_THAN_NUM_COSIGNATORIES: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 6);
pub const FAILURE_MULTISIG_MODIFY_MAX_COSIGNERS: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 7);
pub const FAILURE_MULTISIG_MODIFY_MAX_COSIGNED_ACCOUNTS: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 8);
pub const FAILURE_MULTISIG_MODIFY_LOOP: ValidationResult = ValidationResult::failure(facility::MULTISIG, 9);
pub const FAILURE_MULTISIG_MODIFY_MAX_MULTISIG_DEPTH: ValidationResult =
    ValidationResult::failure(facility::MULTISIG, 10);

fn multisig_cache<'a>(context: &ValidatorContext<'a>) -> Option<ReadOnlySubCache<'a, MultisigCacheDescriptor>> {
    context.cache.try_sub::<MultisigCacheDescriptor>().ok()
}

// =============================================================================
// MODIFICATIONS
// =============================================================================

/// A cosignatory may appear at most once per transaction.
#[derive(Debug, Clone, Default)]
pub struct ModifyMultisigRedundantModificationsValidator;

impl StatelessValidator<ModifyMultisigCosignersNotification> for ModifyMultisigRedundantModificationsValidator {
    fn name(&self) -> &str {
        "ModifyMultisigRedundantModificationsValidator"
    }

    fn validate(&self, notification: &ModifyMultisigCosignersNotification) -> ValidationResult {
        let mut seen = BTreeSet::new();
        for modification in &notification.modifications {
            if !seen.insert(modification.cosignatory_key) {
                return FAILURE_MULTISIG_MODIFY_REDUNDANT_MODIFICATIONS;
            }
        }

        ValidationResult::SUCCESS
    }
}

/// Adds must target new cosignatories, deletes existing ones. First error wins.
#[derive(Debug, Clone, Default)]
pub struct ModifyMultisigInvalidCosignersValidator;

impl StatefulValidator<ModifyMultisigCosignersNotification> for ModifyMultisigInvalidCosignersValidator {
    fn name(&self) -> &str {
        "ModifyMultisigInvalidCosignersValidator"
    }

    fn validate(
        &self,
        notification: &ModifyMultisigCosignersNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        let Some(multisig) = multisig_cache(context) else {
            return ValidationResult::FAILURE;
        };

        let Some(entry) = multisig.find(&notification.signer) else {
            let has_deletion = notification
                .modifications
                .iter()
                .any(|modification| modification.modification_type == CosignatoryModificationType::Del);
            return if has_deletion {
                FAILURE_MULTISIG_MODIFY_UNKNOWN_MULTISIG_ACCOUNT
            } else {
                ValidationResult::SUCCESS
            };
        };

        for modification in &notification.modifications {
            let is_cosignatory = entry.cosignatories.contains(&modification.cosignatory_key);
            match modification.modification_type {
                CosignatoryModificationType::Add if is_cosignatory => {
                    return FAILURE_MULTISIG_MODIFY_ALREADY_A_COSIGNER;
                }
                CosignatoryModificationType::Del if !is_cosignatory => {
                    return FAILURE_MULTISIG_MODIFY_NOT_A_COSIGNER;
                }
                _ => {}
            }
        }

        ValidationResult::SUCCESS
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Resulting thresholds must lie in `1..=cosignatories`.
///
/// Checked against the cosignatory count after this transaction's own
/// modifications. An account left without cosignatories stops being
/// multisig, so both thresholds must then drop to zero.
#[derive(Debug, Clone, Default)]
pub struct ModifyMultisigInvalidSettingsValidator;

impl StatefulValidator<ModifyMultisigSettingsNotification> for ModifyMultisigInvalidSettingsValidator {
    fn name(&self) -> &str {
        "ModifyMultisigInvalidSettingsValidator"
    }

    fn validate(
        &self,
        notification: &ModifyMultisigSettingsNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        let Some(multisig) = multisig_cache(context) else {
            return ValidationResult::FAILURE;
        };

        let (count, min_removal, min_approval) = match multisig.find(&notification.signer) {
            Some(entry) => (entry.cosignatories.len(), entry.min_removal, entry.min_approval),
            None => (0, 0, 0),
        };

        let projected = (count + usize::from(notification.cosignatories_added))
            .saturating_sub(usize::from(notification.cosignatories_removed));
        let new_removal = i16::from(min_removal) + i16::from(notification.min_removal_delta);
        let new_approval = i16::from(min_approval) + i16::from(notification.min_approval_delta);

        if projected == 0 {
            return if new_removal == 0 && new_approval == 0 {
                ValidationResult::SUCCESS
            } else {
                FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE
            };
        }

        if new_removal < 1 || new_approval < 1 {
            return FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE;
        }

        let limit = i16::try_from(projected).unwrap_or(i16::MAX);
        if new_removal > limit || new_approval > limit {
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_LARGER_THAN_NUM_COSIGNATORIES
        } else {
            ValidationResult::SUCCESS
        }
    }
}

// =============================================================================
// LIMITS
// =============================================================================

pub fn create_max_cosigners_validator(
    config: &BlockchainConfiguration,
) -> impl StatefulValidator<ModifyMultisigCosignersNotification> {
    Configured::load(
        "ModifyMultisigMaxCosignersValidator",
        config,
        |multisig_config: MultisigConfiguration| {
            let max_cosigners = usize::from(multisig_config.max_cosigners_per_account);
            stateful(
                "ModifyMultisigMaxCosignersValidator",
                move |notification: &ModifyMultisigCosignersNotification, context: &ValidatorContext<'_>| {
                    let Some(multisig) = multisig_cache(context) else {
                        return ValidationResult::FAILURE;
                    };

                    let current = multisig
                        .find(&notification.signer)
                        .map_or(0, |entry| entry.cosignatories.len());
                    let added = notification
                        .modifications
                        .iter()
                        .filter(|modification| modification.modification_type == CosignatoryModificationType::Add)
                        .count();
                    let removed = notification.modifications.len() - added;

                    if (current + added).saturating_sub(removed) > max_cosigners {
                        FAILURE_MULTISIG_MODIFY_MAX_COSIGNERS
                    } else {
                        ValidationResult::SUCCESS
                    }
                },
            )
        },
    )
}

pub fn create_max_cosigned_accounts_validator(
    config: &BlockchainConfiguration,
) -> impl StatefulValidator<ModifyMultisigNewCosignerNotification> {
    Configured::load(
        "ModifyMultisigMaxCosignedAccountsValidator",
        config,
        |multisig_config: MultisigConfiguration| {
            let max_cosigned = usize::from(multisig_config.max_cosigned_accounts_per_account);
            stateful(
                "ModifyMultisigMaxCosignedAccountsValidator",
                move |notification: &ModifyMultisigNewCosignerNotification, context: &ValidatorContext<'_>| {
                    let Some(multisig) = multisig_cache(context) else {
                        return ValidationResult::FAILURE;
                    };

                    let cosigned = multisig
                        .find(&notification.cosignatory_key)
                        .map_or(0, |entry| entry.multisig_accounts.len());
                    if cosigned >= max_cosigned {
                        FAILURE_MULTISIG_MODIFY_MAX_COSIGNED_ACCOUNTS
                    } else {
                        ValidationResult::SUCCESS
                    }
                },
            )
        },
    )
}

// =============================================================================
// LOOPS AND DEPTH
// =============================================================================

/// Keys reachable from `start` and the number of levels walked.
fn walk(
    multisig: ReadOnlySubCache<'_, MultisigCacheDescriptor>,
    start: Key,
    links: fn(&MultisigEntry) -> &BTreeSet<Key>,
) -> (BTreeSet<Key>, usize) {
    let mut visited = BTreeSet::new();
    let mut current = vec![start];
    let mut levels = 0;

    loop {
        let mut next = Vec::new();
        for key in &current {
            if let Some(entry) = multisig.find(key) {
                next.extend(links(entry).iter().filter(|linked| visited.insert(**linked)).copied());
            }
        }

        if next.is_empty() {
            return (visited, levels);
        }

        levels += 1;
        current = next;
    }
}

pub fn create_loop_and_level_validator(
    config: &BlockchainConfiguration,
) -> impl StatefulValidator<ModifyMultisigNewCosignerNotification> {
    Configured::load(
        "ModifyMultisigLoopAndLevelValidator",
        config,
        |multisig_config: MultisigConfiguration| {
            let max_depth = usize::from(multisig_config.max_multisig_depth);
            stateful(
                "ModifyMultisigLoopAndLevelValidator",
                move |notification: &ModifyMultisigNewCosignerNotification, context: &ValidatorContext<'_>| {
                    let multisig_account = notification.multisig_account_key;
                    let cosignatory = notification.cosignatory_key;
                    if multisig_account == cosignatory {
                        return FAILURE_MULTISIG_MODIFY_LOOP;
                    }

                    let Some(multisig) = multisig_cache(context) else {
                        return ValidationResult::FAILURE;
                    };

                    let (ancestors, levels_up) = walk(multisig, multisig_account, |entry| &entry.multisig_accounts);
                    let (descendants, levels_down) = walk(multisig, cosignatory, |entry| &entry.cosignatories);

                    let creates_loop = ancestors.contains(&cosignatory)
                        || descendants.contains(&multisig_account)
                        || !ancestors.is_disjoint(&descendants);
                    if creates_loop {
                        return FAILURE_MULTISIG_MODIFY_LOOP;
                    }

                    if levels_up + 1 + levels_down > max_depth {
                        FAILURE_MULTISIG_MODIFY_MAX_MULTISIG_DEPTH
                    } else {
                        ValidationResult::SUCCESS
                    }
                },
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{full_config, key, PluginFixture};
    use cc_01_cache::CatapultCacheDelta;
    use cc_02_model::CosignatoryModification;
    use shared_types::Height;

    const ADD: CosignatoryModificationType = CosignatoryModificationType::Add;
    const DEL: CosignatoryModificationType = CosignatoryModificationType::Del;

    /// Links `cosignatories` under `account` with the given thresholds.
    fn make_multisig(delta: &mut CatapultCacheDelta, account: u8, cosignatories: &[u8], min_removal: u8, min_approval: u8) {
        let multisig = delta.sub_mut::<MultisigCacheDescriptor>();
        let mut entry = multisig.find(&key(account)).cloned().unwrap_or_else(|| MultisigEntry::new(key(account)));
        entry.min_removal = min_removal;
        entry.min_approval = min_approval;
        for cosignatory in cosignatories {
            entry.cosignatories.insert(key(*cosignatory));
            let mut cosignatory_entry = multisig
                .find(&key(*cosignatory))
                .cloned()
                .unwrap_or_else(|| MultisigEntry::new(key(*cosignatory)));
            cosignatory_entry.multisig_accounts.insert(key(account));
            multisig.set(cosignatory_entry);
        }
        multisig.set(entry);
    }

    fn fixture(setup: impl FnOnce(&mut CatapultCacheDelta)) -> PluginFixture {
        let fixture = PluginFixture::with_cache::<MultisigCacheDescriptor>();
        fixture.seed(setup);
        fixture
    }

    fn cosigners(signer: u8, modifications: &[(CosignatoryModificationType, u8)]) -> ModifyMultisigCosignersNotification {
        ModifyMultisigCosignersNotification {
            signer: key(signer),
            modifications: modifications
                .iter()
                .map(|(modification_type, byte)| CosignatoryModification {
                    modification_type: *modification_type,
                    cosignatory_key: key(*byte),
                })
                .collect(),
        }
    }

    fn validate<N: cc_02_model::TypedNotification>(
        fixture: &PluginFixture,
        validator: &impl StatefulValidator<N>,
        notification: &N,
    ) -> ValidationResult {
        fixture.validate(Height(10), |context| validator.validate(notification, context))
    }

    #[test]
    fn test_redundant_modifications() {
        let validator = ModifyMultisigRedundantModificationsValidator;
        assert_eq!(
            validator.validate(&cosigners(1, &[(ADD, 2), (DEL, 3)])),
            ValidationResult::SUCCESS
        );
        assert_eq!(
            validator.validate(&cosigners(1, &[(ADD, 2), (DEL, 2)])),
            FAILURE_MULTISIG_MODIFY_REDUNDANT_MODIFICATIONS
        );
    }

    #[test]
    fn test_invalid_cosigners_unknown_account() {
        let fixture = fixture(|_| {});
        let validator = ModifyMultisigInvalidCosignersValidator;

        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(ADD, 2), (ADD, 3)])),
            ValidationResult::SUCCESS
        );
        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(ADD, 2), (DEL, 3), (ADD, 4)])),
            FAILURE_MULTISIG_MODIFY_UNKNOWN_MULTISIG_ACCOUNT
        );
    }

    #[test]
    fn test_invalid_cosigners_first_error_is_reported() {
        let fixture = fixture(|delta| make_multisig(delta, 1, &[2, 3], 1, 1));
        let validator = ModifyMultisigInvalidCosignersValidator;

        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(ADD, 4), (DEL, 2)])),
            ValidationResult::SUCCESS
        );
        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(ADD, 2), (DEL, 5)])),
            FAILURE_MULTISIG_MODIFY_ALREADY_A_COSIGNER
        );
        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(DEL, 5), (ADD, 2)])),
            FAILURE_MULTISIG_MODIFY_NOT_A_COSIGNER
        );
    }

    fn settings(removal_delta: i8, approval_delta: i8, added: u8, removed: u8) -> ModifyMultisigSettingsNotification {
        ModifyMultisigSettingsNotification {
            signer: key(1),
            min_removal_delta: removal_delta,
            min_approval_delta: approval_delta,
            cosignatories_added: added,
            cosignatories_removed: removed,
        }
    }

    #[test]
    fn test_settings_for_new_multisig() {
        let fixture = fixture(|_| {});
        let validator = ModifyMultisigInvalidSettingsValidator;

        assert_eq!(validate(&fixture, &validator, &settings(1, 2, 2, 0)), ValidationResult::SUCCESS);
        assert_eq!(
            validate(&fixture, &validator, &settings(0, 1, 2, 0)),
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE
        );
        assert_eq!(
            validate(&fixture, &validator, &settings(1, 3, 2, 0)),
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_LARGER_THAN_NUM_COSIGNATORIES
        );
        assert_eq!(validate(&fixture, &validator, &settings(0, 0, 0, 0)), ValidationResult::SUCCESS);
        assert_eq!(
            validate(&fixture, &validator, &settings(-1, -1, 0, 0)),
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE
        );
    }

    #[test]
    fn test_settings_for_existing_multisig() {
        let cosignatories: Vec<u8> = (10..25).collect();
        let fixture = fixture(|delta| make_multisig(delta, 1, &cosignatories, 2, 3));
        let validator = ModifyMultisigInvalidSettingsValidator;

        assert_eq!(validate(&fixture, &validator, &settings(13, 12, 0, 0)), ValidationResult::SUCCESS);
        assert_eq!(
            validate(&fixture, &validator, &settings(14, 0, 0, 0)),
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_LARGER_THAN_NUM_COSIGNATORIES
        );
        assert_eq!(validate(&fixture, &validator, &settings(14, 0, 1, 0)), ValidationResult::SUCCESS);
        assert_eq!(
            validate(&fixture, &validator, &settings(-2, 0, 0, 0)),
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE
        );
        assert_eq!(
            validate(&fixture, &validator, &settings(0, -128, 0, 0)),
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE
        );
    }

    #[test]
    fn test_settings_when_last_cosignatory_leaves() {
        let fixture = fixture(|delta| make_multisig(delta, 1, &[2], 1, 1));
        let validator = ModifyMultisigInvalidSettingsValidator;

        assert_eq!(validate(&fixture, &validator, &settings(-1, -1, 0, 1)), ValidationResult::SUCCESS);
        assert_eq!(
            validate(&fixture, &validator, &settings(0, -1, 0, 1)),
            FAILURE_MULTISIG_MODIFY_MIN_SETTING_OUT_OF_RANGE
        );
    }

    #[test]
    fn test_max_cosigners() {
        let cosignatories: Vec<u8> = (10..19).collect();
        let fixture = fixture(|delta| make_multisig(delta, 1, &cosignatories, 1, 1));
        let validator = create_max_cosigners_validator(&full_config());

        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(ADD, 30)])),
            ValidationResult::SUCCESS
        );
        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(ADD, 30), (ADD, 31)])),
            FAILURE_MULTISIG_MODIFY_MAX_COSIGNERS
        );
        assert_eq!(
            validate(&fixture, &validator, &cosigners(1, &[(ADD, 30), (ADD, 31), (DEL, 10)])),
            ValidationResult::SUCCESS
        );
    }

    fn new_cosigner(account: u8, cosignatory: u8) -> ModifyMultisigNewCosignerNotification {
        ModifyMultisigNewCosignerNotification {
            multisig_account_key: key(account),
            cosignatory_key: key(cosignatory),
        }
    }

    #[test]
    fn test_max_cosigned_accounts() {
        let fixture = fixture(|delta| {
            for account in 10..15 {
                make_multisig(delta, account, &[2], 1, 1);
            }
            for account in 20..24 {
                make_multisig(delta, account, &[3], 1, 1);
            }
        });
        let validator = create_max_cosigned_accounts_validator(&full_config());

        assert_eq!(
            validate(&fixture, &validator, &new_cosigner(1, 3)),
            ValidationResult::SUCCESS
        );
        assert_eq!(
            validate(&fixture, &validator, &new_cosigner(1, 2)),
            FAILURE_MULTISIG_MODIFY_MAX_COSIGNED_ACCOUNTS
        );
    }

    #[test]
    fn test_loops_are_rejected() {
        // 1 <- 2 <- 3 (3 cosigns 2, 2 cosigns 1)
        let fixture = fixture(|delta| {
            make_multisig(delta, 1, &[2], 1, 1);
            make_multisig(delta, 2, &[3], 1, 1);
        });
        let validator = create_loop_and_level_validator(&full_config());

        assert_eq!(validate(&fixture, &validator, &new_cosigner(4, 4)), FAILURE_MULTISIG_MODIFY_LOOP);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(3, 1)), FAILURE_MULTISIG_MODIFY_LOOP);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(2, 1)), FAILURE_MULTISIG_MODIFY_LOOP);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(3, 2)), FAILURE_MULTISIG_MODIFY_LOOP);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(3, 5)), ValidationResult::SUCCESS);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(1, 5)), ValidationResult::SUCCESS);
    }

    #[test]
    fn test_depth_limit() {
        // 1 <- 2 <- 3 <- 4 is three levels deep, the configured maximum
        let fixture = fixture(|delta| {
            make_multisig(delta, 1, &[2], 1, 1);
            make_multisig(delta, 2, &[3], 1, 1);
            make_multisig(delta, 3, &[4], 1, 1);
            make_multisig(delta, 6, &[7], 1, 1);
        });
        let validator = create_loop_and_level_validator(&full_config());

        assert_eq!(validate(&fixture, &validator, &new_cosigner(8, 1)), FAILURE_MULTISIG_MODIFY_MAX_MULTISIG_DEPTH);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(8, 2)), ValidationResult::SUCCESS);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(3, 6)), FAILURE_MULTISIG_MODIFY_MAX_MULTISIG_DEPTH);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(2, 6)), ValidationResult::SUCCESS);
        assert_eq!(validate(&fixture, &validator, &new_cosigner(7, 4)), ValidationResult::SUCCESS);
    }
}
