//! Notifier that records deliveries in the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use super::error::NotifierError;
use super::traits::Notifier;
use super::types::{DeliveryStatus, NotificationReceipt, NotificationRequest};

/// Default sender address.
pub const DEFAULT_SENDER: &str = "noreply@example.com";

/// Mock delivery: validates the request and logs it.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    sender: String,
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_SENDER)
    }
}

impl LogNotifier {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(
        &self,
        request: NotificationRequest,
    ) -> Result<NotificationReceipt, NotifierError> {
        request.validate()?;

        info!(
            from = %self.sender,
            recipient = %request.recipient,
            subject = %request.subject,
            "Notification sent"
        );

        Ok(NotificationReceipt {
            status: DeliveryStatus::Sent,
            recipient: request.recipient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_returns_receipt() {
        let notifier = LogNotifier::default();
        assert_eq!(notifier.sender(), DEFAULT_SENDER);

        let receipt = notifier
            .notify(NotificationRequest::new("ops@example.com", "done", "img1 processed"))
            .await
            .unwrap();

        assert_eq!(receipt.status, DeliveryStatus::Sent);
        assert_eq!(receipt.recipient, "ops@example.com");
    }

    #[tokio::test]
    async fn test_notify_rejects_bad_recipient() {
        let notifier = LogNotifier::new("batch@example.com");
        let err = notifier
            .notify(NotificationRequest::new("nobody", "done", "body"))
            .await
            .unwrap_err();

        assert!(matches!(err, NotifierError::InvalidRecipient(_)));
    }
}
