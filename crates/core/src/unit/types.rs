//! Types for units, outcomes and batch results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One independently processable item of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit<T> {
    /// Identifier, unique within a batch.
    pub id: String,
    /// Payload handed to the worker. Opaque to the orchestrator.
    pub payload: T,
}

impl<T> Unit<T> {
    /// Creates a new unit.
    pub fn new(id: impl Into<String>, payload: T) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

impl Unit<()> {
    /// Creates a unit that carries nothing but its identifier.
    pub fn bare(id: impl Into<String>) -> Self {
        Self::new(id, ())
    }
}

/// Classification of a unit failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The worker reported a failure.
    Worker,
    /// The worker hit an I/O error.
    Io,
    /// The unit exceeded the configured per-unit timeout.
    Timeout,
    /// The worker panicked.
    Panicked,
    /// A downstream collaborator called by the worker failed.
    Collaborator,
}

impl ErrorKind {
    /// Returns the snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Io => "io",
            Self::Timeout => "timeout",
            Self::Panicked => "panicked",
            Self::Collaborator => "collaborator",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<R> {
    /// The worker returned a value.
    Success { id: String, value: R },
    /// The worker failed, timed out or panicked.
    Failure {
        id: String,
        reason: ErrorKind,
        detail: String,
    },
    /// The batch was cancelled before this unit finished.
    Cancelled { id: String },
}

/// Status of an outcome without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failure,
    Cancelled,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<R> Outcome<R> {
    /// Creates a successful outcome.
    pub fn success(id: impl Into<String>, value: R) -> Self {
        Self::Success {
            id: id.into(),
            value,
        }
    }

    /// Creates a failed outcome.
    pub fn failure(id: impl Into<String>, reason: ErrorKind, detail: impl Into<String>) -> Self {
        Self::Failure {
            id: id.into(),
            reason,
            detail: detail.into(),
        }
    }

    /// Creates a cancelled outcome.
    pub fn cancelled(id: impl Into<String>) -> Self {
        Self::Cancelled { id: id.into() }
    }

    /// Identifier of the unit this outcome belongs to.
    pub fn id(&self) -> &str {
        match self {
            Self::Success { id, .. } | Self::Failure { id, .. } | Self::Cancelled { id } => id,
        }
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            Self::Success { .. } => OutcomeStatus::Success,
            Self::Failure { .. } => OutcomeStatus::Failure,
            Self::Cancelled { .. } => OutcomeStatus::Cancelled,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&R> {
        match self {
            Self::Success { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<ErrorKind> {
        match self {
            Self::Failure { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// The failure detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Failure { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Aggregate counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub duration_ms: u64,
}

/// The complete, ordered set of outcomes plus timing for one run.
///
/// Outcomes follow submission order, never completion order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<R> {
    batch_id: Uuid,
    outcomes: Vec<Outcome<R>>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    #[serde(with = "duration_ms")]
    duration: Duration,
}

impl<R> BatchResult<R> {
    pub(crate) fn new(
        batch_id: Uuid,
        outcomes: Vec<Outcome<R>>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            batch_id,
            outcomes,
            started_at,
            finished_at,
            duration,
        }
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    /// Outcomes in submission order.
    pub fn outcomes(&self) -> &[Outcome<R>] {
        &self.outcomes
    }

    /// Consumes the result, returning the outcomes.
    pub fn into_outcomes(self) -> Vec<Outcome<R>> {
        self.outcomes
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Elapsed time between the first admission and the last collected outcome.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Looks up the outcome for a unit id.
    pub fn get(&self, id: &str) -> Option<&Outcome<R>> {
        self.outcomes.iter().find(|o| o.id() == id)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn cancelled(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_cancelled()).count()
    }

    /// Success values in submission order.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &R)> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Success { id, value } => Some((id.as_str(), value)),
            _ => None,
        })
    }

    /// Failures in submission order.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome<R>> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.len(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            cancelled: self.cancelled(),
            duration_ms: self.duration.as_millis() as u64,
        }
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
