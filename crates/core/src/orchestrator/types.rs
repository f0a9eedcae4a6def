//! Types for the batch orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors that abort a run before any unit starts.
///
/// Per-unit failures are never reported through this type; they become
/// [`crate::Outcome::Failure`] entries in the batch result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// Concurrency limit below one.
    #[error("invalid concurrency limit: {0} (must be at least 1)")]
    InvalidConcurrencyLimit(usize),

    /// Per-unit timeout of zero.
    #[error("invalid unit timeout: must be greater than zero")]
    InvalidTimeout,

    /// Two units in the same batch share an id.
    #[error("duplicate unit id in batch: {0}")]
    DuplicateUnitId(String),
}

/// Live counters across all runs of an orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    /// Units whose worker is currently running.
    pub active_units: usize,
    /// Units submitted but not yet admitted.
    pub queued_units: usize,
    /// Configured limit (`None` = unbounded).
    pub max_concurrent: Option<usize>,
    /// Units that finished successfully since creation.
    pub total_succeeded: u64,
    /// Units that failed since creation.
    pub total_failed: u64,
    /// Units that were cancelled since creation.
    pub total_cancelled: u64,
}
