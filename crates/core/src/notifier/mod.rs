//! Downstream notification service boundary.
//!
//! Workers may notify a downstream service as part of their own work. The
//! orchestrator never calls a notifier directly; it only sees the worker's
//! resulting outcome. A failed notification surfaces through
//! [`crate::WorkerError::Collaborator`] so the unit is recorded as failed.

mod error;
mod log_notifier;
mod traits;
mod types;

pub use error::NotifierError;
pub use log_notifier::{LogNotifier, DEFAULT_SENDER};
pub use traits::Notifier;
pub use types::{DeliveryStatus, NotificationReceipt, NotificationRequest};
