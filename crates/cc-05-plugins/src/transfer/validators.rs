use super::TransferConfiguration;
use cc_02_model::{BlockchainConfiguration, TransferMessageNotification, TransferMosaicsNotification};
use cc_03_validators::{stateless, Configured, StatelessValidator};
use shared_types::{facility, ValidationResult};

pub const FAILURE_TRANSFER_MESSAGE_TOO_LARGE: ValidationResult =
    ValidationResult::failure(facility::TRANSFER, 1);
pub const FAILURE_TRANSFER_OUT_OF_ORDER_MOSAICS: ValidationResult =
    ValidationResult::failure(facility::TRANSFER, 2);

pub fn create_transfer_message_validator(
    config: &BlockchainConfiguration,
) -> impl StatelessValidator<TransferMessageNotification> {
    Configured::load(
        "TransferMessageValidator",
        config,
        |transfer_config: TransferConfiguration| {
            let max_message_size = transfer_config.max_message_size;
            stateless(
                "TransferMessageValidator",
                move |notification: &TransferMessageNotification| {
                    if notification.message_size > max_message_size {
                        FAILURE_TRANSFER_MESSAGE_TOO_LARGE
                    } else {
                        ValidationResult::SUCCESS
                    }
                },
            )
        },
    )
}

/// Mosaics must be sorted by id without duplicates.
#[derive(Debug, Clone, Default)]
pub struct TransferMosaicsValidator;

impl StatelessValidator<TransferMosaicsNotification> for TransferMosaicsValidator {
    fn name(&self) -> &str {
        "TransferMosaicsValidator"
    }

    fn validate(&self, notification: &TransferMosaicsNotification) -> ValidationResult {
        let ordered = notification
            .mosaics
            .windows(2)
            .all(|pair| pair[0].mosaic_id < pair[1].mosaic_id);

        if ordered {
            ValidationResult::SUCCESS
        } else {
            FAILURE_TRANSFER_OUT_OF_ORDER_MOSAICS
        }
    }
}
