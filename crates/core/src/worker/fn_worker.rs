//! Adapter turning an async closure into a [`Worker`].

use async_trait::async_trait;
use std::future::Future;

use super::error::WorkerError;
use super::traits::Worker;
use crate::unit::Unit;

/// A worker backed by a closure returning a future.
#[derive(Clone)]
pub struct FnWorker<F> {
    f: F,
}

/// Wraps `f` as a worker.
///
/// ```ignore
/// let worker = worker_fn(|unit: Unit<()>| async move {
///     Ok::<_, WorkerError>(format!("processed_{}.jpg", unit.id))
/// });
/// ```
pub fn worker_fn<F>(f: F) -> FnWorker<F> {
    FnWorker { f }
}

#[async_trait]
impl<T, R, F, Fut> Worker<T> for FnWorker<F>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(Unit<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, WorkerError>> + Send,
{
    type Output = R;

    async fn process(&self, unit: Unit<T>) -> Result<R, WorkerError> {
        (self.f)(unit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_worker() {
        let worker = worker_fn(|unit: Unit<u32>| async move {
            if unit.payload == 0 {
                Err(WorkerError::failed("zero"))
            } else {
                Ok(unit.payload * 2)
            }
        });

        assert_eq!(worker.process(Unit::new("a", 21)).await.unwrap(), 42);
        assert!(worker.process(Unit::new("b", 0)).await.is_err());
    }
}
