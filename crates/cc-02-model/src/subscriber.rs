//! Notification sinks.

use crate::mempool::Mempool;
use crate::notifications::Notification;

/// Receives the ordered notification stream of one publishing pass.
pub trait NotificationSubscriber {
    fn notify(&mut self, notification: Notification);

    /// Arena scoped to the current pass.
    fn mempool(&mut self) -> &mut Mempool;
}

/// Subscriber that records every notification in order.
#[derive(Debug, Default)]
pub struct CollectingSubscriber {
    notifications: Vec<Notification>,
    mempool: Mempool,
}

impl CollectingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Ends the pass, handing out the notifications and their mempool.
    pub fn into_parts(self) -> (Vec<Notification>, Mempool) {
        (self.notifications, self.mempool)
    }
}

impl NotificationSubscriber for CollectingSubscriber {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn mempool(&mut self) -> &mut Mempool {
        &mut self.mempool
    }
}
