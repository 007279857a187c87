use super::HashLockInfoCacheDescriptor;
use cc_02_model::{HashLockDurationNotification, HashLockMosaicNotification, HashLockNotification, TransactionNotification};
use cc_03_validators::{StatefulValidator, StatelessValidator, ValidatorContext};
use shared_types::{
    facility, Amount, BlockDuration, EntityType, ValidationResult, FAILURE_CORE_INSUFFICIENT_BALANCE,
};

pub const FAILURE_LOCK_HASH_INVALID_MOSAIC_ID: ValidationResult = ValidationResult::failure(facility::LOCK_HASH, 1);
pub const FAILURE_LOCK_HASH_INVALID_MOSAIC_AMOUNT: ValidationResult =
    ValidationResult::failure(facility::LOCK_HASH, 2);
pub const FAILURE_LOCK_HASH_HASH_EXISTS: ValidationResult = ValidationResult::failure(facility::LOCK_HASH, 3);
pub const FAILURE_LOCK_HASH_INVALID_DURATION: ValidationResult = ValidationResult::failure(facility::LOCK_HASH, 4);
pub const FAILURE_LOCK_HASH_MISSING_LOCK: ValidationResult = ValidationResult::failure(facility::LOCK_HASH, 5);
pub const FAILURE_LOCK_HASH_INACTIVE_HASH: ValidationResult = ValidationResult::failure(facility::LOCK_HASH, 6);

/// Duration must be in `1..=max`.
#[derive(Debug, Clone)]
pub struct HashLockDurationValidator {
    max_duration: BlockDuration,
}

impl HashLockDurationValidator {
    pub fn new(max_duration: BlockDuration) -> Self {
        Self { max_duration }
    }
}

impl StatelessValidator<HashLockDurationNotification> for HashLockDurationValidator {
    fn name(&self) -> &str {
        "HashLockDurationValidator"
    }

    fn validate(&self, notification: &HashLockDurationNotification) -> ValidationResult {
        if notification.duration.0 == 0 || notification.duration > self.max_duration {
            FAILURE_LOCK_HASH_INVALID_DURATION
        } else {
            ValidationResult::SUCCESS
        }
    }
}

/// Exactly the configured amount of the currency mosaic must be locked.
#[derive(Debug, Clone)]
pub struct HashLockMosaicValidator {
    locked_funds: Amount,
}

impl HashLockMosaicValidator {
    pub fn new(locked_funds: Amount) -> Self {
        Self { locked_funds }
    }
}

impl StatefulValidator<HashLockMosaicNotification> for HashLockMosaicValidator {
    fn name(&self) -> &str {
        "HashLockMosaicValidator"
    }

    fn validate(&self, notification: &HashLockMosaicNotification, context: &ValidatorContext<'_>) -> ValidationResult {
        if context.resolve_mosaic_id(notification.mosaic.mosaic_id) != context.config.currency_mosaic_id {
            return FAILURE_LOCK_HASH_INVALID_MOSAIC_ID;
        }

        if notification.mosaic.amount != self.locked_funds {
            FAILURE_LOCK_HASH_INVALID_MOSAIC_AMOUNT
        } else {
            ValidationResult::SUCCESS
        }
    }
}

/// A hash may be locked once; the owner must be able to fund the lock.
#[derive(Debug, Clone, Default)]
pub struct HashLockCacheUniqueValidator;

impl StatefulValidator<HashLockNotification> for HashLockCacheUniqueValidator {
    fn name(&self) -> &str {
        "HashLockCacheUniqueValidator"
    }

    fn validate(&self, notification: &HashLockNotification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Ok(locks) = context.cache.try_sub::<HashLockInfoCacheDescriptor>() else {
            return ValidationResult::FAILURE;
        };

        if locks.contains(&notification.hash) {
            return FAILURE_LOCK_HASH_HASH_EXISTS;
        }

        let mosaic_id = context.resolve_mosaic_id(notification.mosaic.mosaic_id);
        let owner = context.address_of(&notification.signer);
        if context.reserve_debit(&owner, mosaic_id, notification.mosaic.amount) {
            ValidationResult::SUCCESS
        } else {
            FAILURE_CORE_INSUFFICIENT_BALANCE
        }
    }
}

/// A bonded aggregate needs an active lock on its hash.
#[derive(Debug, Clone, Default)]
pub struct AggregateHashPresentValidator;

impl StatefulValidator<TransactionNotification> for AggregateHashPresentValidator {
    fn name(&self) -> &str {
        "AggregateHashPresentValidator"
    }

    fn validate(&self, notification: &TransactionNotification, context: &ValidatorContext<'_>) -> ValidationResult {
        if notification.transaction_type != EntityType::AGGREGATE_BONDED {
            return ValidationResult::SUCCESS;
        }

        let Ok(locks) = context.cache.try_sub::<HashLockInfoCacheDescriptor>() else {
            return ValidationResult::FAILURE;
        };

        match locks.find(&notification.transaction_hash) {
            None => FAILURE_LOCK_HASH_MISSING_LOCK,
            Some(lock) if !lock.is_active(context.height) => FAILURE_LOCK_HASH_INACTIVE_HASH,
            Some(lock) => {
                // completion releases the locked funds before the embedded transactions run
                context.record_credit(&context.address_of(&lock.owner), lock.mosaic_id, lock.amount);
                ValidationResult::SUCCESS
            }
        }
    }
}
