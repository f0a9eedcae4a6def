//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the worker, reporter and
//! notifier traits, allowing batch behavior to be tested without real work.
//!
//! # Example
//!
//! ```rust,ignore
//! use fanout_core::testing::{fixtures, MockWorker, RecordingReporter};
//!
//! let worker = MockWorker::new();
//! let reporter = RecordingReporter::new();
//!
//! let orchestrator = Orchestrator::new(config).with_reporter(Arc::new(reporter.clone()));
//! let result = orchestrator.run(fixtures::image_units(5), Arc::new(worker.clone())).await?;
//! ```

mod mock_notifier;
mod mock_worker;
mod recording_reporter;

pub use mock_notifier::MockNotifier;
pub use mock_worker::{MockFailure, MockWorker};
pub use recording_reporter::RecordingReporter;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::unit::Unit;

    /// Image ids `img1..=imgN`.
    pub fn image_ids(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("img{}", i)).collect()
    }

    /// Units `img1..=imgN` without payload.
    pub fn image_units(count: usize) -> Vec<Unit<()>> {
        image_ids(count).into_iter().map(Unit::bare).collect()
    }

    /// Units `u0..uN` carrying their index as payload.
    pub fn indexed_units(count: usize) -> Vec<Unit<usize>> {
        (0..count).map(|i| Unit::new(format!("u{}", i), i)).collect()
    }
}
