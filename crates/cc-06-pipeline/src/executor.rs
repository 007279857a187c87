//! # Executors
//!
//! ```text
//! bytes ─► Transaction::parse ─► registry.find_top_level (declared == real size)
//!       ─► NotificationPublisher::publish ─► CollectingSubscriber (+ Mempool)
//!       ─► NotificationValidator::validate_all (stateless, then stateful)
//!       ─► materialize deferred amounts
//!       ─► AggregateNotificationObserver::notify_all (Commit) ─► TransactionUndo
//! ```
//!
//! A block runs its transactions in order on one delta, then observes the
//! block notification. Rollback replays the undo records in reverse.

use crate::domain::{Block, BlockContext, BlockUndo, TransactionUndo};
use crate::error::{ExecutionError, ExecutionResult};
use catapult_telemetry::{
    HistogramTimer, BLOCK_EXECUTION_DURATION, NOTIFICATIONS_PUBLISHED, TRANSACTIONS_EXECUTED, VALIDATION_FAILURES,
};
use cc_01_cache::CatapultCacheDelta;
use cc_02_model::{
    calculate_hash, BlockNotification, BlockStatement, BlockchainConfiguration, CollectingSubscriber, DecodeError,
    Mempool, Notification, NotificationPublisher, PublicationMode, ResolveError, ResolverContext, Resolvers,
    Transaction, TransactionInfo, TransactionRegistry, UnresolvedAmount,
};
use cc_03_validators::{NotificationValidator, ValidatorContext};
use cc_04_observers::{AggregateNotificationObserver, NotifyMode, ObserverContext, ObserverState};
use cc_05_plugins::PluginBundle;
use shared_types::{EntityType, Hash256, Height, ValidationResult};
use std::sync::Arc;
use tracing::{debug, info_span, trace};

/// Notifications of one transaction and the mempool their deferred amounts live in.
#[derive(Debug)]
pub struct PublishedTransaction {
    pub hash: Hash256,
    pub entity_type: EntityType,
    pub notifications: Vec<Notification>,
    pub mempool: Mempool,
}

// =============================================================================
// TRANSACTION EXECUTOR
// =============================================================================

pub struct TransactionExecutor {
    config: Arc<BlockchainConfiguration>,
    registry: Arc<TransactionRegistry>,
    publisher: NotificationPublisher,
    validator: Arc<NotificationValidator>,
    observer: Arc<AggregateNotificationObserver>,
    resolvers: Arc<Resolvers>,
    record_metrics: bool,
}

impl TransactionExecutor {
    pub fn new(bundle: &PluginBundle, record_metrics: bool) -> Self {
        Self {
            config: Arc::clone(&bundle.config),
            registry: Arc::clone(&bundle.registry),
            publisher: NotificationPublisher::new(
                Arc::clone(&bundle.registry),
                bundle.config.currency_mosaic_id,
                PublicationMode::All,
            ),
            validator: Arc::clone(&bundle.validator),
            observer: Arc::clone(&bundle.observer),
            resolvers: Arc::clone(&bundle.resolvers),
            record_metrics,
        }
    }

    pub fn config(&self) -> &BlockchainConfiguration {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TransactionRegistry> {
        &self.registry
    }

    /// Decodes `bytes` and publishes its notifications without touching state.
    pub fn publish(&self, bytes: &[u8], context: &BlockContext) -> Result<PublishedTransaction, DecodeError> {
        let transaction = Transaction::parse(bytes)?;
        let plugin = self.registry.find_top_level(&transaction)?;
        let hash = calculate_hash(plugin, &transaction);

        let mut sub = CollectingSubscriber::new();
        self.publisher.publish(
            &TransactionInfo {
                transaction: &transaction,
                hash,
                associated_height: context.height,
            },
            context.fee_multiplier,
            &mut sub,
        )?;

        let (notifications, mempool) = sub.into_parts();
        Ok(PublishedTransaction {
            hash,
            entity_type: transaction.header.entity_type,
            notifications,
            mempool,
        })
    }

    /// Validates the transaction at `index` against `delta` and, when every
    /// validator passes, applies it in Commit mode.
    pub fn execute(
        &self,
        index: usize,
        bytes: &[u8],
        delta: &mut CatapultCacheDelta,
        context: &BlockContext,
        state: &mut ObserverState,
    ) -> ExecutionResult<TransactionUndo> {
        let published = match self.publish(bytes, context) {
            Ok(published) => published,
            Err(error) => {
                self.count_transaction("decode_error");
                return Err(ExecutionError::decode(index, error));
            }
        };

        if self.record_metrics {
            NOTIFICATIONS_PUBLISHED.inc_by(published.notifications.len() as f64);
        }

        let resolver_context = ResolverContext::new(&self.resolvers, &published.mempool);
        let result = {
            let validator_context = ValidatorContext::new(
                context.height,
                context.timestamp,
                &self.config,
                delta.as_read_only(),
                &resolver_context,
            );
            self.validator.validate_all(&published.notifications, &validator_context)
        };

        if result.is_failure() {
            debug!(
                "[Executor] transaction {} ({}) rejected at height {}: {}",
                index, published.hash, context.height, result
            );
            self.count_failure(result);
            return Err(ExecutionError::Rejected {
                index,
                hash: published.hash,
                result,
            });
        }

        let notifications = published
            .notifications
            .iter()
            .map(|notification| {
                notification.materialize(|deferred| {
                    resolver_context.resolve_amount(delta.as_read_only(), &UnresolvedAmount::Deferred(*deferred))
                })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        let mut observer_context = ObserverContext::new(
            delta,
            context.height,
            NotifyMode::Commit,
            &self.config,
            &resolver_context,
            state,
        );
        self.observer.notify_all(&notifications, &mut observer_context)?;

        trace!(
            "[Executor] applied transaction {} with {} notifications",
            published.hash,
            notifications.len()
        );
        self.count_transaction("success");

        Ok(TransactionUndo {
            hash: published.hash,
            entity_type: published.entity_type,
            notifications,
        })
    }

    /// Undoes one transaction applied at `height`.
    pub fn rollback(
        &self,
        undo: &TransactionUndo,
        delta: &mut CatapultCacheDelta,
        height: Height,
        state: &mut ObserverState,
    ) -> ExecutionResult<()> {
        self.observe(&undo.notifications, delta, height, NotifyMode::Rollback, state)
    }

    /// Validates notifications that carry no deferred amounts.
    fn validate_materialized(
        &self,
        notifications: &[Notification],
        delta: &CatapultCacheDelta,
        context: &BlockContext,
    ) -> ValidationResult {
        let resolver_context = ResolverContext::without_mempool(&self.resolvers);
        let validator_context = ValidatorContext::new(
            context.height,
            context.timestamp,
            &self.config,
            delta.as_read_only(),
            &resolver_context,
        );
        self.validator.validate_all(notifications, &validator_context)
    }

    /// Observes notifications that carry no deferred amounts.
    fn observe(
        &self,
        notifications: &[Notification],
        delta: &mut CatapultCacheDelta,
        height: Height,
        mode: NotifyMode,
        state: &mut ObserverState,
    ) -> ExecutionResult<()> {
        let resolver_context = ResolverContext::without_mempool(&self.resolvers);
        let mut observer_context = ObserverContext::new(delta, height, mode, &self.config, &resolver_context, state);
        self.observer.notify_all(notifications, &mut observer_context)?;
        Ok(())
    }

    fn count_transaction(&self, outcome: &str) {
        if self.record_metrics {
            TRANSACTIONS_EXECUTED.with_label_values(&[outcome]).inc();
        }
    }

    fn count_failure(&self, result: ValidationResult) {
        if self.record_metrics {
            TRANSACTIONS_EXECUTED.with_label_values(&["rejected"]).inc();
            VALIDATION_FAILURES
                .with_label_values(&[&format!("{:#04x}", result.facility())])
                .inc();
        }
    }
}

// =============================================================================
// BLOCK EXECUTOR
// =============================================================================

/// Outcome of applying one block to a delta.
#[derive(Debug)]
pub struct BlockExecution {
    pub undo: BlockUndo,
    pub statement: BlockStatement,
    pub statement_hash: Hash256,
}

pub struct BlockExecutor {
    transactions: TransactionExecutor,
    record_metrics: bool,
}

impl BlockExecutor {
    pub fn new(bundle: &PluginBundle, record_metrics: bool) -> Self {
        Self {
            transactions: TransactionExecutor::new(bundle, record_metrics),
            record_metrics,
        }
    }

    pub fn transactions(&self) -> &TransactionExecutor {
        &self.transactions
    }

    /// Applies every transaction of `block`, then the block notification.
    ///
    /// Stops at the first failing transaction; `delta` is then partially
    /// applied and must be discarded.
    pub fn execute(&self, block: &Block, delta: &mut CatapultCacheDelta) -> ExecutionResult<BlockExecution> {
        let span = info_span!("execute_block", height = block.height.0, transactions = block.transactions.len());
        let _enter = span.enter();
        let _timer = self.record_metrics.then(|| HistogramTimer::new(&BLOCK_EXECUTION_DURATION));

        let context = block.context();
        let block_notifications: Vec<Notification> = vec![BlockNotification {
            timestamp: block.timestamp,
            transactions_count: u32::try_from(block.transactions.len()).unwrap_or(u32::MAX),
        }
        .into()];

        let result = self
            .transactions
            .validate_materialized(&block_notifications, delta, &context);
        if result.is_failure() {
            return Err(ExecutionError::BlockRejected {
                height: block.height,
                result,
            });
        }

        let mut state = ObserverState::new();
        let mut transactions = Vec::with_capacity(block.transactions.len());
        for (index, bytes) in block.transactions.iter().enumerate() {
            transactions.push(self.transactions.execute(index, bytes, delta, &context, &mut state)?);
        }

        self.transactions
            .observe(&block_notifications, delta, block.height, NotifyMode::Commit, &mut state)?;
        state.commit_removals(delta, block.height, self.transactions.config.network)?;

        let stash = state.take_stash();
        let statement = state.into_statement();
        let statement_hash = statement
            .hash()
            .map_err(|error| ExecutionError::Statement(error.to_string()))?;

        debug!(
            "[Executor] executed block {} ({} transactions, {} receipt sources)",
            block.height,
            transactions.len(),
            statement.len()
        );

        Ok(BlockExecution {
            undo: BlockUndo {
                height: block.height,
                transactions,
                block_notifications,
                stash,
            },
            statement,
            statement_hash,
        })
    }

    /// Reverts `undo` on `delta`: block notifications first, then the
    /// transactions from last to first.
    pub fn rollback(&self, undo: &BlockUndo, delta: &mut CatapultCacheDelta) -> ExecutionResult<()> {
        let span = info_span!("rollback_block", height = undo.height.0, transactions = undo.transactions.len());
        let _enter = span.enter();

        let mut state = ObserverState::with_stash(undo.stash.clone());
        self.transactions
            .observe(&undo.block_notifications, delta, undo.height, NotifyMode::Rollback, &mut state)?;

        for transaction in undo.transactions.iter().rev() {
            self.transactions.rollback(transaction, delta, undo.height, &mut state)?;
        }

        state.commit_removals(delta, undo.height, self.transactions.config.network)?;
        debug!("[Executor] rolled back block {}", undo.height);
        Ok(())
    }
}
