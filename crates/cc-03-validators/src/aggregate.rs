//! # Aggregate Validators
//!
//! Demux builders collect typed validators and dispatch each notification to
//! the validators registered for its type, in registration order.
//!
//! Aggregation stops at the first failure and reports the worst severity
//! seen up to and including it (`Success < Neutral < Failure`).

use crate::context::ValidatorContext;
use crate::validator::{StatefulValidator, StatelessValidator};
use cc_02_model::{Notification, NotificationChannel, TypedNotification};
use shared_types::ValidationResult;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::debug;

/// Folds `results` lazily, stopping after the first failure.
pub fn aggregate_results(results: impl IntoIterator<Item = ValidationResult>) -> ValidationResult {
    let mut aggregate = ValidationResult::SUCCESS;
    for result in results {
        aggregate = aggregate.worst(result);
        if result.is_failure() {
            break;
        }
    }

    aggregate
}

fn accepts(notification: &Notification) -> bool {
    notification
        .channel()
        .contains(NotificationChannel::VALIDATOR)
}

// =============================================================================
// STATELESS
// =============================================================================

trait ErasedStatelessValidator: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, notification: &Notification) -> ValidationResult;
}

struct TypedStatelessValidator<N, V> {
    validator: V,
    _marker: PhantomData<fn(&N)>,
}

impl<N, V> ErasedStatelessValidator for TypedStatelessValidator<N, V>
where
    N: TypedNotification,
    V: StatelessValidator<N>,
{
    fn name(&self) -> &str {
        self.validator.name()
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        match N::from_notification(notification) {
            Some(typed) => self.validator.validate(typed),
            None => ValidationResult::SUCCESS,
        }
    }
}

#[derive(Default)]
pub struct DemuxStatelessValidatorBuilder {
    validators: BTreeMap<u32, Vec<Box<dyn ErasedStatelessValidator>>>,
    names: Vec<String>,
}

impl DemuxStatelessValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<N, V>(&mut self, validator: V) -> &mut Self
    where
        N: TypedNotification,
        V: StatelessValidator<N> + 'static,
    {
        self.names.push(validator.name().to_string());
        self.validators
            .entry(N::NOTIFICATION_TYPE.without_channel())
            .or_default()
            .push(Box::new(TypedStatelessValidator {
                validator,
                _marker: PhantomData,
            }));
        self
    }

    pub fn build(self) -> AggregateStatelessValidator {
        AggregateStatelessValidator {
            validators: self.validators,
            names: self.names,
        }
    }
}

pub struct AggregateStatelessValidator {
    validators: BTreeMap<u32, Vec<Box<dyn ErasedStatelessValidator>>>,
    names: Vec<String>,
}

impl AggregateStatelessValidator {
    /// Names of all validators in registration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn validate(&self, notification: &Notification) -> ValidationResult {
        if !accepts(notification) {
            return ValidationResult::SUCCESS;
        }

        let key = notification.notification_type().without_channel();
        let Some(validators) = self.validators.get(&key) else {
            return ValidationResult::SUCCESS;
        };

        aggregate_results(validators.iter().map(|validator| {
            let result = validator.validate(notification);
            if result.is_failure() {
                debug!("[Validator] {} rejected notification: {}", validator.name(), result);
            }
            result
        }))
    }
}

// =============================================================================
// STATEFUL
// =============================================================================

trait ErasedStatefulValidator: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult;
}

struct TypedStatefulValidator<N, V> {
    validator: V,
    _marker: PhantomData<fn(&N)>,
}

impl<N, V> ErasedStatefulValidator for TypedStatefulValidator<N, V>
where
    N: TypedNotification,
    V: StatefulValidator<N>,
{
    fn name(&self) -> &str {
        self.validator.name()
    }

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        match N::from_notification(notification) {
            Some(typed) => self.validator.validate(typed, context),
            None => ValidationResult::SUCCESS,
        }
    }
}

#[derive(Default)]
pub struct DemuxStatefulValidatorBuilder {
    validators: BTreeMap<u32, Vec<Box<dyn ErasedStatefulValidator>>>,
    names: Vec<String>,
}

impl DemuxStatefulValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<N, V>(&mut self, validator: V) -> &mut Self
    where
        N: TypedNotification,
        V: StatefulValidator<N> + 'static,
    {
        self.names.push(validator.name().to_string());
        self.validators
            .entry(N::NOTIFICATION_TYPE.without_channel())
            .or_default()
            .push(Box::new(TypedStatefulValidator {
                validator,
                _marker: PhantomData,
            }));
        self
    }

    pub fn build(self) -> AggregateStatefulValidator {
        AggregateStatefulValidator {
            validators: self.validators,
            names: self.names,
        }
    }
}

pub struct AggregateStatefulValidator {
    validators: BTreeMap<u32, Vec<Box<dyn ErasedStatefulValidator>>>,
    names: Vec<String>,
}

impl AggregateStatefulValidator {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        if !accepts(notification) {
            return ValidationResult::SUCCESS;
        }

        let key = notification.notification_type().without_channel();
        let Some(validators) = self.validators.get(&key) else {
            return ValidationResult::SUCCESS;
        };

        aggregate_results(validators.iter().map(|validator| {
            let result = validator.validate(notification, context);
            if result.is_failure() {
                debug!("[Validator] {} rejected notification: {}", validator.name(), result);
            }
            result
        }))
    }
}

// =============================================================================
// COMBINED
// =============================================================================

/// Stateless then stateful validation of a whole notification sequence.
pub struct NotificationValidator {
    stateless: AggregateStatelessValidator,
    stateful: AggregateStatefulValidator,
}

impl NotificationValidator {
    pub fn new(stateless: AggregateStatelessValidator, stateful: AggregateStatefulValidator) -> Self {
        Self { stateless, stateful }
    }

    pub fn stateless(&self) -> &AggregateStatelessValidator {
        &self.stateless
    }

    pub fn stateful(&self) -> &AggregateStatefulValidator {
        &self.stateful
    }

    /// Stateful rules run only when every notification passes the stateless rules.
    pub fn validate_all(&self, notifications: &[Notification], context: &ValidatorContext<'_>) -> ValidationResult {
        let stateless = aggregate_results(notifications.iter().map(|n| self.stateless.validate(n)));
        if stateless.is_failure() {
            return stateless;
        }

        stateless.worst(aggregate_results(
            notifications.iter().map(|n| self.stateful.validate(n, context)),
        ))
    }
}
