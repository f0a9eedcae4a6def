//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notifier::{
    DeliveryStatus, NotificationReceipt, NotificationRequest, Notifier, NotifierError,
};

/// Mock implementation of the Notifier trait.
///
/// Records every request and can be told to fail the next delivery.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    /// Requests that were delivered.
    sent: Arc<RwLock<Vec<NotificationRequest>>>,
    /// If set, the next delivery will fail with this error.
    next_error: Arc<RwLock<Option<NotifierError>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all delivered requests.
    pub async fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.read().await.clone()
    }

    /// Configure the next delivery to fail with the given error.
    pub async fn set_next_error(&self, error: NotifierError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(
        &self,
        request: NotificationRequest,
    ) -> Result<NotificationReceipt, NotifierError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        request.validate()?;

        let recipient = request.recipient.clone();
        self.sent.write().await.push(request);

        Ok(NotificationReceipt {
            status: DeliveryStatus::Sent,
            recipient,
        })
    }
}
