//! Reporter that records events for assertions.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::reporter::{BatchEvent, Reporter};

/// Records every event it receives, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<RwLock<Vec<BatchEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events.
    pub async fn events(&self) -> Vec<BatchEvent> {
        self.events.read().await.clone()
    }

    /// Event type names in arrival order.
    pub async fn event_types(&self) -> Vec<&'static str> {
        self.events
            .read()
            .await
            .iter()
            .map(BatchEvent::event_type)
            .collect()
    }

    /// Events concerning one unit, in arrival order.
    pub async fn unit_events(&self, id: &str) -> Vec<BatchEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.unit_id() == Some(id))
            .cloned()
            .collect()
    }

    /// Number of per-unit events recorded.
    pub async fn unit_event_count(&self) -> usize {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.unit_id().is_some())
            .count()
    }

    /// Clear recorded events.
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl Reporter for RecordingReporter {
    async fn report(&self, event: &BatchEvent) {
        self.events.write().await.push(event.clone());
    }
}
