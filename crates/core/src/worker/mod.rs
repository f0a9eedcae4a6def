//! Worker functions that turn a unit's payload into a value.

mod error;
mod fn_worker;
mod traits;

pub use error::WorkerError;
pub use fn_worker::{worker_fn, FnWorker};
pub use traits::Worker;
