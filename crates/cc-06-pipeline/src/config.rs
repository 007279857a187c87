//! Chain service configuration.

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::ChainService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Optional plugins to load, by name. The core plugin is always loaded.
    pub plugins: Vec<String>,

    /// Undo records kept for rollback. `None` uses the network's
    /// `maxRollbackBlocks`.
    pub max_undo_records: Option<u32>,

    /// Buffered summaries per finalization subscriber.
    pub finalization_channel_capacity: usize,

    /// Record Prometheus metrics while executing.
    pub record_metrics: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            plugins: Vec::new(),
            max_undo_records: None,
            finalization_channel_capacity: 256,
            record_metrics: true,
        }
    }
}

impl ExecutionConfig {
    /// Configuration loading every named plugin.
    pub fn with_plugins<S: AsRef<str>>(plugins: &[S]) -> Self {
        Self {
            plugins: plugins.iter().map(|name| name.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Undo depth given the network's rollback limit.
    pub fn undo_depth(&self, max_rollback_blocks: u32) -> usize {
        self.max_undo_records.unwrap_or(max_rollback_blocks) as usize
    }
}
