//! Validators built from a typed plugin configuration.

use crate::context::ValidatorContext;
use crate::validator::{StatefulValidator, StatelessValidator};
use cc_02_model::{BlockchainConfiguration, PluginConfiguration, TypedNotification};
use shared_types::{ConfigError, ValidationResult, FAILURE_CORE_PLUGIN_CONFIG_MALFORMED};
use tracing::warn;

/// A validator whose configuration either parsed or did not.
///
/// A malformed configuration turns the validator into one that rejects every
/// notification with `FAILURE_CORE_PLUGIN_CONFIG_MALFORMED`.
pub enum Configured<V> {
    Ready(V),
    Malformed { name: String, error: ConfigError },
}

impl<V> Configured<V> {
    /// Parses `C` from `config` and builds the validator from it.
    pub fn load<C: PluginConfiguration>(
        name: &str,
        config: &BlockchainConfiguration,
        create: impl FnOnce(C) -> V,
    ) -> Self {
        match config.plugin_config::<C>() {
            Ok(plugin_config) => Self::Ready(create(plugin_config)),
            Err(error) => {
                warn!("[Validator] {} has malformed configuration: {}", name, error);
                Self::Malformed {
                    name: name.to_string(),
                    error,
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl<N, V> StatelessValidator<N> for Configured<V>
where
    N: TypedNotification,
    V: StatelessValidator<N>,
{
    fn name(&self) -> &str {
        match self {
            Self::Ready(validator) => validator.name(),
            Self::Malformed { name, .. } => name,
        }
    }

    fn validate(&self, notification: &N) -> ValidationResult {
        match self {
            Self::Ready(validator) => validator.validate(notification),
            Self::Malformed { .. } => FAILURE_CORE_PLUGIN_CONFIG_MALFORMED,
        }
    }
}

impl<N, V> StatefulValidator<N> for Configured<V>
where
    N: TypedNotification,
    V: StatefulValidator<N>,
{
    fn name(&self) -> &str {
        match self {
            Self::Ready(validator) => validator.name(),
            Self::Malformed { name, .. } => name,
        }
    }

    fn validate(&self, notification: &N, context: &ValidatorContext<'_>) -> ValidationResult {
        match self {
            Self::Ready(validator) => validator.validate(notification, context),
            Self::Malformed { .. } => FAILURE_CORE_PLUGIN_CONFIG_MALFORMED,
        }
    }
}
