use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::unit::{BatchSummary, ErrorKind, Outcome, OutcomeStatus};

/// Batch lifecycle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    BatchStarted {
        batch_id: Uuid,
        count: usize,
    },
    UnitStarted {
        batch_id: Uuid,
        id: String,
    },
    UnitCompleted {
        batch_id: Uuid,
        id: String,
        status: OutcomeStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<ErrorKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    BatchFinished {
        batch_id: Uuid,
        summary: BatchSummary,
    },
}

impl BatchEvent {
    /// Builds the completion event for an outcome.
    pub fn unit_completed<R>(batch_id: Uuid, outcome: &Outcome<R>) -> Self {
        Self::UnitCompleted {
            batch_id,
            id: outcome.id().to_string(),
            status: outcome.status(),
            reason: outcome.reason(),
            detail: outcome.detail().map(String::from),
        }
    }

    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BatchStarted { .. } => "batch_started",
            Self::UnitStarted { .. } => "unit_started",
            Self::UnitCompleted { .. } => "unit_completed",
            Self::BatchFinished { .. } => "batch_finished",
        }
    }

    pub fn batch_id(&self) -> Uuid {
        match self {
            Self::BatchStarted { batch_id, .. }
            | Self::UnitStarted { batch_id, .. }
            | Self::UnitCompleted { batch_id, .. }
            | Self::BatchFinished { batch_id, .. } => *batch_id,
        }
    }

    /// Unit id for per-unit events
    pub fn unit_id(&self) -> Option<&str> {
        match self {
            Self::UnitStarted { id, .. } | Self::UnitCompleted { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Converts the event into a leveled record with key/value context.
    pub fn to_record(&self) -> LogRecord {
        let mut record = match self {
            Self::BatchStarted { count, .. } => {
                LogRecord::new(LogLevel::Info, "--- Starting batch processing ---")
                    .field("count", count)
            }
            Self::UnitStarted { id, .. } => {
                LogRecord::new(LogLevel::Info, format!("Starting processing for {}", id))
                    .field("unit_id", id)
            }
            Self::UnitCompleted {
                id,
                status,
                reason,
                detail,
                ..
            } => {
                let (level, message) = match status {
                    OutcomeStatus::Success => (LogLevel::Success, "Finished processing for"),
                    OutcomeStatus::Failure => (LogLevel::Error, "Processing failed for"),
                    OutcomeStatus::Cancelled => (LogLevel::Warning, "Processing cancelled for"),
                };
                let mut record = LogRecord::new(level, format!("{} {}", message, id))
                    .field("unit_id", id)
                    .field("status", status);
                if let Some(reason) = reason {
                    record = record.field("reason", reason);
                }
                if let Some(detail) = detail {
                    record = record.field("detail", detail);
                }
                record
            }
            Self::BatchFinished { summary, .. } => {
                let level = if summary.failed > 0 {
                    LogLevel::Warning
                } else {
                    LogLevel::Success
                };
                let message = format!(
                    "--- Finished batch in {:.2} seconds ---",
                    summary.duration_ms as f64 / 1000.0
                );
                LogRecord::new(level, message)
                    .field("total", summary.total)
                    .field("succeeded", summary.succeeded)
                    .field("failed", summary.failed)
                    .field("cancelled", summary.cancelled)
                    .field("duration_ms", summary.duration_ms)
            }
        };
        record
            .fields
            .insert("batch_id".to_string(), self.batch_id().to_string());
        record
    }
}

/// Severity of a structured log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leveled record with a message and key/value context fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a context field.
    pub fn field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(key.into(), value.to_string());
        self
    }
}

/// Renders `message key=value ...`, fields in key order.
impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}
