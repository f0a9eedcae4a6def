//! Reporter that fans events out to several reporters.

use async_trait::async_trait;
use std::sync::Arc;

use super::events::BatchEvent;
use super::traits::Reporter;

/// Forwards each event to every inner reporter, in insertion order.
#[derive(Clone, Default)]
pub struct CompositeReporter {
    reporters: Vec<Arc<dyn Reporter>>,
}

impl CompositeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reporter.
    pub fn with(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

#[async_trait]
impl Reporter for CompositeReporter {
    async fn report(&self, event: &BatchEvent) {
        for reporter in &self.reporters {
            reporter.report(event).await;
        }
    }
}
