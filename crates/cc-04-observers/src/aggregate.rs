//! # Aggregate Observer
//!
//! Dispatches each notification to the observers registered for its type.
//! Commit runs them in registration order, Rollback in reverse, so an
//! observer always sees the state its own Commit left behind.

use crate::context::ObserverContext;
use crate::errors::ObserverError;
use crate::observer::{NotificationObserver, NotifyMode};
use cc_02_model::{Notification, NotificationChannel, TypedNotification};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::warn;

trait ErasedObserver: Send + Sync {
    fn name(&self) -> &str;

    fn notify(&self, notification: &Notification, context: &mut ObserverContext<'_>) -> Result<(), ObserverError>;
}

struct TypedObserver<N, O> {
    observer: O,
    _marker: PhantomData<fn(&N)>,
}

impl<N, O> ErasedObserver for TypedObserver<N, O>
where
    N: TypedNotification,
    O: NotificationObserver<N>,
{
    fn name(&self) -> &str {
        self.observer.name()
    }

    fn notify(&self, notification: &Notification, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        match N::from_notification(notification) {
            Some(typed) => self.observer.notify(typed, context),
            None => Ok(()),
        }
    }
}

fn run(
    observer: &dyn ErasedObserver,
    notification: &Notification,
    context: &mut ObserverContext<'_>,
) -> Result<(), ObserverError> {
    observer.notify(notification, context).map_err(|error| {
        warn!("[Observer] {} failed ({:?}): {}", observer.name(), context.mode, error);
        error
    })
}

#[derive(Default)]
pub struct DemuxObserverBuilder {
    observers: BTreeMap<u32, Vec<Box<dyn ErasedObserver>>>,
    names: Vec<String>,
}

impl DemuxObserverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<N, O>(&mut self, observer: O) -> &mut Self
    where
        N: TypedNotification,
        O: NotificationObserver<N> + 'static,
    {
        self.names.push(observer.name().to_string());
        self.observers
            .entry(N::NOTIFICATION_TYPE.without_channel())
            .or_default()
            .push(Box::new(TypedObserver {
                observer,
                _marker: PhantomData,
            }));
        self
    }

    pub fn build(self) -> AggregateNotificationObserver {
        AggregateNotificationObserver {
            observers: self.observers,
            names: self.names,
        }
    }
}

pub struct AggregateNotificationObserver {
    observers: BTreeMap<u32, Vec<Box<dyn ErasedObserver>>>,
    names: Vec<String>,
}

impl AggregateNotificationObserver {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Applies `notification` in the context's mode. Notifications without
    /// the observer channel are ignored.
    pub fn notify(&self, notification: &Notification, context: &mut ObserverContext<'_>) -> Result<(), ObserverError> {
        if !notification.channel().contains(NotificationChannel::OBSERVER) {
            return Ok(());
        }

        let key = notification.notification_type().without_channel();
        let Some(observers) = self.observers.get(&key) else {
            return Ok(());
        };

        match context.mode {
            NotifyMode::Commit => observers
                .iter()
                .try_for_each(|observer| run(observer.as_ref(), notification, context)),
            NotifyMode::Rollback => observers
                .iter()
                .rev()
                .try_for_each(|observer| run(observer.as_ref(), notification, context)),
        }
    }

    /// Applies a sequence: forward on Commit, reversed on Rollback.
    pub fn notify_all(
        &self,
        notifications: &[Notification],
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        match context.mode {
            NotifyMode::Commit => notifications
                .iter()
                .try_for_each(|notification| self.notify(notification, context)),
            NotifyMode::Rollback => notifications
                .iter()
                .rev()
                .try_for_each(|notification| self.notify(notification, context)),
        }
    }
}
