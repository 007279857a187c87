use crate::context::ObserverContext;
use crate::errors::ObserverError;
use crate::observer::{NotificationObserver, NotifyMode};
use cc_02_model::SourceChangeNotification;

/// Tracks which transaction receipts are attributed to. Commit only.
#[derive(Debug, Clone, Default)]
pub struct SourceChangeObserver;

impl NotificationObserver<SourceChangeNotification> for SourceChangeObserver {
    fn name(&self) -> &str {
        "SourceChangeObserver"
    }

    fn notify(
        &self,
        notification: &SourceChangeNotification,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        if context.mode == NotifyMode::Commit {
            context.apply_source_change(notification);
        }

        Ok(())
    }
}
