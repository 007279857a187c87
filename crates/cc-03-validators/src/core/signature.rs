use crate::validator::StatelessValidator;
use cc_02_model::SignatureNotification;
use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey};
use shared_types::{ValidationResult, FAILURE_SIGNATURE_NOT_VERIFIABLE};

/// Verifies ed25519 signatures over the notified data.
#[derive(Debug, Clone, Default)]
pub struct SignatureValidator;

impl StatelessValidator<SignatureNotification> for SignatureValidator {
    fn name(&self) -> &str {
        "SignatureValidator"
    }

    fn validate(&self, notification: &SignatureNotification) -> ValidationResult {
        let Ok(key) = VerifyingKey::from_bytes(&notification.signer.0) else {
            return FAILURE_SIGNATURE_NOT_VERIFIABLE;
        };

        let signature = Ed25519Signature::from_bytes(&notification.signature.0);
        match key.verify(&notification.data, &signature) {
            Ok(()) => ValidationResult::SUCCESS,
            Err(_) => FAILURE_SIGNATURE_NOT_VERIFIABLE,
        }
    }
}
