//! Orchestrator configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::OrchestratorError;

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum number of units whose worker runs at the same time.
    /// Unset means every unit is admitted at once.
    #[serde(default)]
    pub concurrency_limit: Option<usize>,

    /// Per-unit timeout (milliseconds).
    /// Unset means a unit may run for as long as its worker takes.
    #[serde(default)]
    pub unit_timeout_ms: Option<u64>,
}

impl OrchestratorConfig {
    /// Sets the concurrency limit.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit);
        self
    }

    /// Removes the concurrency limit.
    pub fn unbounded(mut self) -> Self {
        self.concurrency_limit = None;
        self
    }

    /// Sets the per-unit timeout, rounded up to whole milliseconds.
    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.unit_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// Per-unit timeout as a duration.
    pub fn unit_timeout(&self) -> Option<Duration> {
        self.unit_timeout_ms.map(Duration::from_millis)
    }

    /// Rejects structurally invalid settings.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.concurrency_limit == Some(0) {
            return Err(OrchestratorError::InvalidConcurrencyLimit(0));
        }
        if self.unit_timeout_ms == Some(0) {
            return Err(OrchestratorError::InvalidTimeout);
        }
        Ok(())
    }
}
