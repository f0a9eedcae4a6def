//! Mock worker for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::unit::Unit;
use crate::worker::{Worker, WorkerError};

/// How the mock worker should fail for a given unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// Return `WorkerError::Io` with this message.
    Io(String),
    /// Return `WorkerError::Failed` with this message.
    Failed(String),
    /// Panic with this message.
    Panic(String),
}

/// Mock implementation of the Worker trait.
///
/// Simulates image processing: sleeps for the configured delay and returns
/// `processed_<id>.jpg`. Provides controllable behavior for testing:
/// - Per-unit delays and failures
/// - Records the order in which units were started
/// - Tracks how many invocations were in flight at once
///
/// # Example
///
/// ```rust,ignore
/// use fanout_core::testing::{MockFailure, MockWorker};
///
/// let worker = MockWorker::new();
/// worker.set_failure("img3", MockFailure::Io("I/O error".into())).await;
///
/// let result = orchestrator.run(units, Arc::new(worker.clone())).await?;
/// assert!(worker.max_in_flight() <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockWorker {
    /// Default simulated processing time.
    delay: Arc<RwLock<Duration>>,
    /// Per-unit processing time overrides.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Per-unit failures.
    failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    /// Unit ids in the order their processing started.
    calls: Arc<RwLock<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl Default for MockWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorker {
    /// Create a new mock worker with a 10ms delay.
    pub fn new() -> Self {
        Self {
            delay: Arc::new(RwLock::new(Duration::from_millis(10))),
            delays: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the default simulated processing time.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Set the processing time for one unit.
    pub async fn set_delay_for(&self, id: impl Into<String>, delay: Duration) {
        self.delays.write().await.insert(id.into(), delay);
    }

    /// Configure a unit to fail.
    pub async fn set_failure(&self, id: impl Into<String>, failure: MockFailure) {
        self.failures.write().await.insert(id.into(), failure);
    }

    /// Unit ids in the order their processing started.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Number of invocations performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Invocations currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of invocations observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight counter when an invocation ends, however it ends.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: Send + 'static> Worker<T> for MockWorker {
    type Output = String;

    async fn process(&self, unit: Unit<T>) -> Result<String, WorkerError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        self.calls.write().await.push(unit.id.clone());

        let delay = match self.delays.read().await.get(&unit.id) {
            Some(delay) => *delay,
            None => *self.delay.read().await,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.read().await.get(&unit.id).cloned();
        match failure {
            None => Ok(format!("processed_{}.jpg", unit.id)),
            Some(MockFailure::Io(message)) => Err(WorkerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message,
            ))),
            Some(MockFailure::Failed(message)) => Err(WorkerError::Failed(message)),
            Some(MockFailure::Panic(message)) => panic!("{}", message),
        }
    }
}
