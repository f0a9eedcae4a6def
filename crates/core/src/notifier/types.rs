//! Types for the notifier module.

use serde::{Deserialize, Serialize};

use super::NotifierError;

/// A message for the downstream notification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Recipient address.
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl NotificationRequest {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Checks that the recipient looks like `local@domain.tld`.
    pub fn validate(&self) -> Result<(), NotifierError> {
        let invalid = || NotifierError::InvalidRecipient(self.recipient.clone());

        if self.recipient.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let (local, domain) = self.recipient.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid());
        }
        match domain.rsplit_once('.') {
            Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
            _ => Err(invalid()),
        }
    }
}

/// Delivery status reported by the downstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
}

/// Acknowledgement of a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub status: DeliveryStatus,
    pub recipient: String,
}
