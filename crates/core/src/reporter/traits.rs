//! Trait definitions for the reporter module.

use async_trait::async_trait;

use super::events::BatchEvent;

/// A sink for batch lifecycle events.
///
/// Implementations must not fail the batch: errors inside a reporter are
/// logged and swallowed.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Consumes one event.
    async fn report(&self, event: &BatchEvent);
}

/// Reporter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

#[async_trait]
impl Reporter for NoopReporter {
    async fn report(&self, _event: &BatchEvent) {}
}
