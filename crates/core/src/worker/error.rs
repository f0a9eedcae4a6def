//! Error types for the worker module.

use thiserror::Error;

use crate::notifier::NotifierError;
use crate::unit::ErrorKind;

/// Errors a worker can return for a single unit.
///
/// These never escape a batch run: the orchestrator records them as the
/// unit's [`crate::Outcome::Failure`].
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Generic failure with a message.
    #[error("{0}")]
    Failed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A downstream collaborator call failed.
    #[error("Notification failed: {0}")]
    Collaborator(#[from] NotifierError),
}

impl WorkerError {
    /// Creates a generic failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Classifies this error for the outcome record.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Failed(_) => ErrorKind::Worker,
            Self::Io(_) => ErrorKind::Io,
            Self::Collaborator(_) => ErrorKind::Collaborator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(WorkerError::failed("boom").kind(), ErrorKind::Worker);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(WorkerError::from(io).kind(), ErrorKind::Io);

        let notify = NotifierError::delivery_failed("ops@example.com", "relay down");
        assert_eq!(WorkerError::from(notify).kind(), ErrorKind::Collaborator);
    }

    #[test]
    fn test_display() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "read failed");
        assert_eq!(WorkerError::from(io).to_string(), "I/O error: read failed");
        assert_eq!(WorkerError::failed("bad input").to_string(), "bad input");
    }
}
