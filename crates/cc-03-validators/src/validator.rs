//! Validator traits and closure-backed implementations.

use crate::context::ValidatorContext;
use cc_02_model::TypedNotification;
use shared_types::ValidationResult;
use std::marker::PhantomData;

/// Validates a notification in isolation.
pub trait StatelessValidator<N: TypedNotification>: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, notification: &N) -> ValidationResult;
}

/// Validates a notification against chain state.
pub trait StatefulValidator<N: TypedNotification>: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, notification: &N, context: &ValidatorContext<'_>) -> ValidationResult;
}

pub struct FunctionalStatelessValidator<N, F> {
    name: String,
    validate: F,
    _marker: PhantomData<fn(&N)>,
}

/// Wraps a closure as a named stateless validator.
pub fn stateless<N, F>(name: &str, validate: F) -> FunctionalStatelessValidator<N, F>
where
    N: TypedNotification,
    F: Fn(&N) -> ValidationResult + Send + Sync,
{
    FunctionalStatelessValidator {
        name: name.to_string(),
        validate,
        _marker: PhantomData,
    }
}

impl<N, F> StatelessValidator<N> for FunctionalStatelessValidator<N, F>
where
    N: TypedNotification,
    F: Fn(&N) -> ValidationResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, notification: &N) -> ValidationResult {
        (self.validate)(notification)
    }
}

pub struct FunctionalStatefulValidator<N, F> {
    name: String,
    validate: F,
    _marker: PhantomData<fn(&N)>,
}

/// Wraps a closure as a named stateful validator.
pub fn stateful<N, F>(name: &str, validate: F) -> FunctionalStatefulValidator<N, F>
where
    N: TypedNotification,
    F: Fn(&N, &ValidatorContext<'_>) -> ValidationResult + Send + Sync,
{
    FunctionalStatefulValidator {
        name: name.to_string(),
        validate,
        _marker: PhantomData,
    }
}

impl<N, F> StatefulValidator<N> for FunctionalStatefulValidator<N, F>
where
    N: TypedNotification,
    F: Fn(&N, &ValidatorContext<'_>) -> ValidationResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, notification: &N, context: &ValidatorContext<'_>) -> ValidationResult {
        (self.validate)(notification, context)
    }
}
