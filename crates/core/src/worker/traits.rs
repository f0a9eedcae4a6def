//! Trait definitions for the worker module.

use async_trait::async_trait;

use super::error::WorkerError;
use crate::unit::Unit;

/// The operation applied to every unit of a batch.
///
/// Implementations may suspend; suspension of one unit never blocks the
/// others. A returned error becomes that unit's failure outcome.
#[async_trait]
pub trait Worker<T: Send + 'static>: Send + Sync {
    /// Value produced for a successful unit.
    type Output: Send + 'static;

    /// Processes one unit.
    async fn process(&self, unit: Unit<T>) -> Result<Self::Output, WorkerError>;
}
