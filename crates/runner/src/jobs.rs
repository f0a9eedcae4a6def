//! Image processing demo job.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use fanout_core::{DemoConfig, NotificationRequest, Notifier, Unit, Worker, WorkerError};

/// Simulated image processing.
///
/// Waits for the configured delay (standing in for an upload or an external
/// API call), then returns `processed_<id>.jpg`. Images listed in
/// `fail_ids` fail with an I/O error. When a notifier is attached, each
/// processed image is announced to the recipient; a failed delivery fails
/// the image.
pub struct ImageJob {
    delay: Duration,
    fail_ids: HashSet<String>,
    notifier: Option<(Arc<dyn Notifier>, String)>,
}

impl ImageJob {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail_ids: HashSet::new(),
            notifier: None,
        }
    }

    pub fn from_config(config: &DemoConfig) -> Self {
        Self::new(Duration::from_millis(config.delay_ms))
            .with_failures(config.fail_ids.iter().cloned())
    }

    /// Images that fail with an I/O error.
    pub fn with_failures(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.fail_ids.extend(ids);
        self
    }

    /// Announces processed images to `recipient`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>, recipient: impl Into<String>) -> Self {
        self.notifier = Some((notifier, recipient.into()));
        self
    }
}

#[async_trait]
impl Worker<()> for ImageJob {
    type Output = String;

    async fn process(&self, unit: Unit<()>) -> Result<String, WorkerError> {
        tokio::time::sleep(self.delay).await;

        if self.fail_ids.contains(&unit.id) {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "I/O error").into());
        }

        let output = format!("processed_{}.jpg", unit.id);
        debug!(unit_id = %unit.id, %output, "Image written");

        if let Some((notifier, recipient)) = &self.notifier {
            let request = NotificationRequest::new(
                recipient.as_str(),
                format!("Image {} processed", unit.id),
                format!("Your image is available as {}", output),
            );
            notifier.notify(request).await?;
        }

        Ok(output)
    }
}
