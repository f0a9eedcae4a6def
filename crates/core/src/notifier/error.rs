//! Error types for the notifier module.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    /// The recipient address is malformed.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// The downstream service rejected or failed to deliver the message.
    #[error("Delivery to {recipient} failed: {reason}")]
    DeliveryFailed { recipient: String, reason: String },
}

impl NotifierError {
    /// Creates a delivery failed error.
    pub fn delivery_failed(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            recipient: recipient.into(),
            reason: reason.into(),
        }
    }
}
