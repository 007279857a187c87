//! # Chain Service
//!
//! Owns the committed cache and applies blocks one at a time:
//!
//! ```text
//! apply_block:     create_delta ─► BlockExecutor::execute ─► commit(height) ─► FinalizationSink
//! undo_last_block: create_delta ─► BlockExecutor::rollback ─► commit(height - 1)
//! ```
//!
//! Up to the configured undo depth of block undo records is kept. A failed
//! block leaves the committed state untouched.

use crate::adapters::BroadcastFinalizationSink;
use crate::config::ExecutionConfig;
use crate::domain::{Block, BlockUndo, FinalizedBlock};
use crate::error::{ExecutionError, ExecutionResult};
use crate::executor::BlockExecutor;
use crate::ports::FinalizationSink;
use catapult_telemetry::{BLOCKS_COMMITTED, BLOCKS_ROLLED_BACK, CHAIN_HEIGHT};
use cc_01_cache::{CatapultCache, CatapultCacheDelta, CatapultCacheView};
use cc_02_model::BlockchainConfiguration;
use cc_05_plugins::{load_plugins, PluginBundle, PluginId};
use shared_types::{Hash256, Height};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ChainService {
    cache: CatapultCache,
    executor: BlockExecutor,
    config: Arc<BlockchainConfiguration>,
    plugins: Vec<PluginId>,
    undo_records: VecDeque<BlockUndo>,
    undo_depth: usize,
    sink: Arc<dyn FinalizationSink>,
    record_metrics: bool,
}

impl ChainService {
    pub fn new(bundle: PluginBundle, config: &ExecutionConfig, sink: Arc<dyn FinalizationSink>) -> Self {
        let executor = BlockExecutor::new(&bundle, config.record_metrics);
        let undo_depth = config.undo_depth(bundle.config.max_rollback_blocks);

        Self {
            cache: bundle.cache,
            executor,
            config: bundle.config,
            plugins: bundle.plugins,
            undo_records: VecDeque::with_capacity(undo_depth),
            undo_depth,
            sink,
            record_metrics: config.record_metrics,
        }
    }

    /// Loads the configured plugins and publishes summaries on a broadcast sink.
    pub fn from_config(
        blockchain: BlockchainConfiguration,
        config: &ExecutionConfig,
    ) -> ExecutionResult<(Self, BroadcastFinalizationSink)> {
        let bundle = load_plugins(blockchain, &config.plugins)?;
        let sink = BroadcastFinalizationSink::new(config.finalization_channel_capacity);
        let service = Self::new(bundle, config, Arc::new(sink.clone()));

        info!(
            "[ChainService] started with plugins {:?}, undo depth {}",
            service.plugins, service.undo_depth
        );
        Ok((service, sink))
    }

    pub fn config(&self) -> &BlockchainConfiguration {
        &self.config
    }

    pub fn plugins(&self) -> &[PluginId] {
        &self.plugins
    }

    pub fn executor(&self) -> &BlockExecutor {
        &self.executor
    }

    pub fn cache(&self) -> &CatapultCache {
        &self.cache
    }

    pub fn height(&self) -> Height {
        self.cache.height()
    }

    pub fn create_view(&self) -> CatapultCacheView {
        self.cache.create_view()
    }

    pub fn state_hash(&self) -> ExecutionResult<Hash256> {
        Ok(self.cache.create_view().state_hash()?)
    }

    /// Number of blocks that can currently be undone.
    pub fn undo_records(&self) -> usize {
        self.undo_records.len()
    }

    /// Writes initial state directly and commits it as the next height.
    ///
    /// Seeded state has no undo record; earlier undo records are dropped.
    pub fn seed(&mut self, setup: impl FnOnce(&mut CatapultCacheDelta)) -> ExecutionResult<Height> {
        let height = self.next_height();
        let mut delta = self.cache.create_delta()?;
        setup(&mut delta);
        self.cache.commit(delta, height)?;
        self.undo_records.clear();

        info!("[ChainService] seeded state at height {}", height);
        Ok(height)
    }

    /// Executes `block` on top of the committed state and commits it.
    pub fn apply_block(&mut self, block: &Block) -> ExecutionResult<FinalizedBlock> {
        let expected = self.next_height();
        if block.height != expected {
            return Err(ExecutionError::HeightMismatch {
                expected,
                actual: block.height,
            });
        }

        let mut delta = self.cache.create_delta()?;
        let execution = match self.executor.execute(block, &mut delta) {
            Ok(execution) => execution,
            Err(error) => {
                warn!("[ChainService] block {} rejected: {}", block.height, error);
                return Err(error);
            }
        };

        let state_hash = delta.state_hash()?;
        self.cache.commit(delta, block.height)?;

        let finalized = FinalizedBlock {
            height: block.height,
            state_hash,
            statement_hash: execution.statement_hash,
            transaction_hashes: execution.undo.transaction_hashes(),
            receipts_count: execution.statement.len(),
        };

        self.remember(execution.undo);
        self.sink.finalize(&finalized);

        if self.record_metrics {
            BLOCKS_COMMITTED.inc();
            CHAIN_HEIGHT.set(block.height.0 as f64);
        }

        info!(
            "[ChainService] committed block {} with {} transactions, state {}",
            finalized.height,
            finalized.transaction_hashes.len(),
            finalized.state_hash
        );
        Ok(finalized)
    }

    /// Rolls back the most recent block and returns the new height.
    pub fn undo_last_block(&mut self) -> ExecutionResult<Height> {
        let undo = self.undo_records.pop_back().ok_or(ExecutionError::NothingToUndo)?;

        let mut delta = match self.cache.create_delta() {
            Ok(delta) => delta,
            Err(error) => {
                self.undo_records.push_back(undo);
                return Err(error.into());
            }
        };

        if let Err(error) = self.executor.rollback(&undo, &mut delta) {
            warn!("[ChainService] rollback of block {} failed: {}", undo.height, error);
            self.undo_records.push_back(undo);
            return Err(error);
        }

        let height = undo.height.prev();
        if let Err(error) = self.cache.commit(delta, height) {
            self.undo_records.push_back(undo);
            return Err(error.into());
        }

        if self.record_metrics {
            BLOCKS_ROLLED_BACK.inc();
            CHAIN_HEIGHT.set(height.0 as f64);
        }

        info!("[ChainService] rolled back block {}, height now {}", undo.height, height);
        Ok(height)
    }

    fn next_height(&self) -> Height {
        Height(self.cache.height().0 + 1)
    }

    fn remember(&mut self, undo: BlockUndo) {
        if self.undo_depth == 0 {
            return;
        }

        while self.undo_records.len() >= self.undo_depth {
            self.undo_records.pop_front();
        }
        self.undo_records.push_back(undo);
    }
}
