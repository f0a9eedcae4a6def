use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::events::BatchEvent;
use super::traits::Reporter;

/// Envelope wrapping a batch event with metadata
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub timestamp: DateTime<Utc>,
    pub event: BatchEvent,
}

/// Reporter that forwards events over a bounded channel
///
/// This is cheaply cloneable and can be shared across tasks.
/// Sending never waits: if the channel is full or closed, the error is
/// logged and the event is dropped, so a slow consumer cannot stall a batch.
#[derive(Clone)]
pub struct ChannelReporter {
    tx: mpsc::Sender<EventEnvelope>,
}

impl ChannelReporter {
    /// Create a new channel reporter from a channel sender
    pub fn new(tx: mpsc::Sender<EventEnvelope>) -> Self {
        Self { tx }
    }

    /// Try to forward an event without blocking
    ///
    /// Returns true if the event was sent successfully, false otherwise.
    pub fn try_emit(&self, event: BatchEvent) -> bool {
        let envelope = EventEnvelope {
            timestamp: Utc::now(),
            event,
        };
        match self.tx.try_send(envelope) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to forward batch event: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl Reporter for ChannelReporter {
    async fn report(&self, event: &BatchEvent) {
        self.try_emit(event.clone());
    }
}

/// Create a channel reporter and the receiving end of its channel
///
/// # Arguments
/// * `buffer_size` - Size of the channel buffer (events are dropped if full)
pub fn create_event_channel(buffer_size: usize) -> (ChannelReporter, mpsc::Receiver<EventEnvelope>) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (ChannelReporter::new(tx), rx)
}
