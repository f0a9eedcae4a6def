//! Bounded-concurrency batch orchestrator.
//!
//! The orchestrator admits units in submission order, at most
//! `concurrency_limit` at a time (all at once when unset). Each admitted
//! unit runs as its own tokio task:
//! - **Admission**: FIFO through a fair semaphore
//! - **Isolation**: errors, panics and timeouts become failure outcomes
//! - **Collection**: outcomes are stored by submission index
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fanout_core::{worker_fn, Orchestrator, OrchestratorConfig, Unit, WorkerError};
//!
//! let orchestrator = Orchestrator::new(OrchestratorConfig::default().with_concurrency_limit(2));
//! let worker = Arc::new(worker_fn(|unit: Unit<()>| async move {
//!     Ok::<_, WorkerError>(format!("processed_{}.jpg", unit.id))
//! }));
//!
//! let result = orchestrator.run(vec![Unit::bare("img1"), Unit::bare("img2")], worker).await?;
//! assert_eq!(result.succeeded(), 2);
//! ```

mod cancel;
mod config;
mod runner;
mod types;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use config::OrchestratorConfig;
pub use runner::{run, Orchestrator};
pub use types::{OrchestratorError, OrchestratorStatus};
