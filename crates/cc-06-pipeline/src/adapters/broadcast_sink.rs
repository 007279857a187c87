use crate::domain::FinalizedBlock;
use crate::ports::FinalizationSink;
use tokio::sync::broadcast;
use tracing::trace;

/// Fans finalized block summaries out to any number of subscribers.
///
/// Sending never waits. Slow subscribers lag and lose the oldest summaries;
/// with no subscriber the summary is dropped.
#[derive(Debug, Clone)]
pub struct BroadcastFinalizationSink {
    sender: broadcast::Sender<FinalizedBlock>,
}

impl BroadcastFinalizationSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FinalizedBlock> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl FinalizationSink for BroadcastFinalizationSink {
    fn finalize(&self, block: &FinalizedBlock) {
        if self.sender.send(block.clone()).is_err() {
            trace!("[Finalization] no subscribers for height {}", block.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Hash256, Height};
    use tokio::sync::broadcast::error::TryRecvError;

    fn summary(height: u64) -> FinalizedBlock {
        FinalizedBlock {
            height: Height(height),
            state_hash: Hash256([1; 32]),
            statement_hash: Hash256([2; 32]),
            transaction_hashes: Vec::new(),
            receipts_count: 0,
        }
    }

    #[test]
    fn test_every_subscriber_receives() {
        let sink = BroadcastFinalizationSink::new(4);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();

        sink.finalize(&summary(7));

        assert_eq!(first.try_recv().unwrap().height, Height(7));
        assert_eq!(second.try_recv().unwrap().height, Height(7));
        assert_eq!(sink.subscriber_count(), 2);
    }

    #[test]
    fn test_without_subscribers_does_not_fail() {
        let sink = BroadcastFinalizationSink::new(4);
        sink.finalize(&summary(1));

        let mut late = sink.subscribe();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_slow_subscriber_lags() {
        let sink = BroadcastFinalizationSink::new(2);
        let mut receiver = sink.subscribe();
        for height in 1..=3 {
            sink.finalize(&summary(height));
        }

        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Lagged(1))));
        assert_eq!(receiver.try_recv().unwrap().height, Height(2));
    }
}
