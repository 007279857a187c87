//! Observer trait and closure-backed implementation.

use crate::context::ObserverContext;
use crate::errors::ObserverError;
use cc_02_model::TypedNotification;
use std::marker::PhantomData;

/// Direction of an observation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyMode {
    Commit,
    Rollback,
}

/// Applies one notification type to the cache delta.
///
/// Rollback must undo exactly what Commit did for the same notification.
pub trait NotificationObserver<N: TypedNotification>: Send + Sync {
    fn name(&self) -> &str;

    fn notify(&self, notification: &N, context: &mut ObserverContext<'_>) -> Result<(), ObserverError>;
}

pub struct FunctionalObserver<N, F> {
    name: String,
    notify: F,
    _marker: PhantomData<fn(&N)>,
}

/// Wraps a closure as a named observer.
pub fn observer<N, F>(name: &str, notify: F) -> FunctionalObserver<N, F>
where
    N: TypedNotification,
    F: Fn(&N, &mut ObserverContext<'_>) -> Result<(), ObserverError> + Send + Sync,
{
    FunctionalObserver {
        name: name.to_string(),
        notify,
        _marker: PhantomData,
    }
}

impl<N, F> NotificationObserver<N> for FunctionalObserver<N, F>
where
    N: TypedNotification,
    F: Fn(&N, &mut ObserverContext<'_>) -> Result<(), ObserverError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn notify(&self, notification: &N, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        (self.notify)(notification, context)
    }
}
