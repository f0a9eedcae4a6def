//! Units of work and their outcomes.
//!
//! A [`Unit`] is created by the caller, consumed exactly once by the
//! orchestrator, and answered by exactly one [`Outcome`] inside the
//! returned [`BatchResult`].

mod types;

pub use types::{BatchResult, BatchSummary, ErrorKind, Outcome, OutcomeStatus, Unit};
