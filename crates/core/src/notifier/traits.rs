//! Trait definitions for the notifier module.

use async_trait::async_trait;

use super::error::NotifierError;
use super::types::{NotificationReceipt, NotificationRequest};

/// A downstream service that accepts a recipient, subject and body.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the name of this notifier implementation.
    fn name(&self) -> &str;

    /// Delivers a notification.
    async fn notify(&self, request: NotificationRequest)
        -> Result<NotificationReceipt, NotifierError>;
}
