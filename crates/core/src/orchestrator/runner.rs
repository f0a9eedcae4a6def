//! Batch orchestrator implementation.

use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::reporter::{BatchEvent, Reporter, TracingReporter};
use crate::unit::{BatchResult, ErrorKind, Outcome, Unit};
use crate::worker::Worker;

use super::cancel::CancelSignal;
use super::config::OrchestratorConfig;
use super::types::{OrchestratorError, OrchestratorStatus};

/// Counters shared by every task of every run.
#[derive(Default)]
struct UnitStats {
    active: AtomicU64,
    queued: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

impl UnitStats {
    fn to_status(&self, max_concurrent: Option<usize>) -> OrchestratorStatus {
        OrchestratorStatus {
            active_units: self.active.load(Ordering::Relaxed) as usize,
            queued_units: self.queued.load(Ordering::Relaxed) as usize,
            max_concurrent,
            total_succeeded: self.succeeded.load(Ordering::Relaxed),
            total_failed: self.failed.load(Ordering::Relaxed),
            total_cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }

    fn record<R>(&self, outcome: &Outcome<R>) {
        let counter = match outcome {
            Outcome::Success { .. } => &self.succeeded,
            Outcome::Failure { .. } => &self.failed,
            Outcome::Cancelled { .. } => &self.cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Everything a unit task needs besides the unit and the worker.
struct UnitContext {
    batch_id: Uuid,
    reporter: Arc<dyn Reporter>,
    stats: Arc<UnitStats>,
    timeout: Option<Duration>,
    cancel: CancelSignal,
}

/// Position of a unit in the batch.
enum Slot<R> {
    /// Admitted and running (or finished) as a task.
    Spawned { id: String, handle: JoinHandle<Outcome<R>> },
    /// Never admitted because the batch was cancelled.
    NotStarted { id: String },
}

/// Runs batches of units through a worker with bounded concurrency.
///
/// Every submitted unit yields exactly one outcome, in submission order.
/// A failing, panicking or timed-out unit is recorded as a failure and
/// never aborts the rest of the batch.
pub struct Orchestrator {
    config: OrchestratorConfig,
    reporter: Arc<dyn Reporter>,
    stats: Arc<UnitStats>,
}

impl Orchestrator {
    /// Creates an orchestrator that reports through [`TracingReporter`].
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            reporter: Arc::new(TracingReporter),
            stats: Arc::new(UnitStats::default()),
        }
    }

    /// Sets the reporter receiving lifecycle events.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns live counters.
    pub fn status(&self) -> OrchestratorStatus {
        self.stats.to_status(self.config.concurrency_limit)
    }

    /// Runs a batch to completion.
    ///
    /// Fails only on invalid configuration, before any unit starts.
    pub async fn run<T, W>(
        &self,
        units: Vec<Unit<T>>,
        worker: Arc<W>,
    ) -> Result<BatchResult<W::Output>, OrchestratorError>
    where
        T: Send + 'static,
        W: Worker<T> + 'static,
    {
        self.run_with_cancel(units, worker, CancelSignal::never())
            .await
    }

    /// Runs a batch that can be cancelled through `cancel`.
    ///
    /// On cancellation, finished outcomes are kept and every other unit is
    /// recorded as [`Outcome::Cancelled`].
    pub async fn run_with_cancel<T, W>(
        &self,
        units: Vec<Unit<T>>,
        worker: Arc<W>,
        cancel: CancelSignal,
    ) -> Result<BatchResult<W::Output>, OrchestratorError>
    where
        T: Send + 'static,
        W: Worker<T> + 'static,
    {
        self.config.validate()?;
        check_unique_ids(&units)?;

        let batch_id = Uuid::new_v4();
        let count = units.len();
        let semaphore = self
            .config
            .concurrency_limit
            .map(|limit| Arc::new(Semaphore::new(limit.min(Semaphore::MAX_PERMITS))));
        let context = Arc::new(UnitContext {
            batch_id,
            reporter: Arc::clone(&self.reporter),
            stats: Arc::clone(&self.stats),
            timeout: self.config.unit_timeout(),
            cancel: cancel.clone(),
        });

        let started_at = Utc::now();
        let clock = Instant::now();

        emit(&self.reporter, &BatchEvent::BatchStarted { batch_id, count }).await;
        self.stats.queued.fetch_add(count as u64, Ordering::Relaxed);
        debug!(%batch_id, count, limit = ?self.config.concurrency_limit, "Admitting units");

        let mut slots: Vec<Slot<W::Output>> = Vec::with_capacity(count);
        let mut pending = units.into_iter();

        while let Some(unit) = pending.next() {
            let permit = match &semaphore {
                Some(semaphore) => match acquire(semaphore, &cancel).await {
                    Some(permit) => Some(permit),
                    None => {
                        slots.push(Slot::NotStarted { id: unit.id });
                        break;
                    }
                },
                None => None,
            };

            if cancel.is_cancelled() {
                slots.push(Slot::NotStarted { id: unit.id });
                break;
            }

            let id = unit.id.clone();
            let worker = Arc::clone(&worker);
            let context = Arc::clone(&context);
            let handle = tokio::spawn(async move {
                let _permit = permit;
                execute_unit(unit, worker, context).await
            });
            slots.push(Slot::Spawned { id, handle });
        }
        slots.extend(pending.map(|unit| Slot::NotStarted { id: unit.id }));

        let mut outcomes = Vec::with_capacity(count);
        for slot in slots {
            let outcome = match slot {
                Slot::Spawned { id, handle } => match handle.await {
                    Ok(outcome) => outcome,
                    // Only reachable if the runtime aborts the task
                    Err(e) => {
                        warn!(%batch_id, unit_id = %id, error = %e, "Unit task aborted");
                        Outcome::failure(id, ErrorKind::Panicked, e.to_string())
                    }
                },
                Slot::NotStarted { id } => {
                    self.stats.queued.fetch_sub(1, Ordering::Relaxed);
                    let outcome = Outcome::cancelled(id);
                    self.stats.record(&outcome);
                    outcome
                }
            };
            outcomes.push(outcome);
        }

        let finished_at = Utc::now();
        let duration = clock.elapsed();
        let result = BatchResult::new(batch_id, outcomes, started_at, finished_at, duration);

        emit(
            &self.reporter,
            &BatchEvent::BatchFinished {
                batch_id,
                summary: result.summary(),
            },
        )
        .await;

        Ok(result)
    }
}

/// Runs `units` through `worker` with an optional concurrency limit.
///
/// Shorthand for an [`Orchestrator`] with the default reporter.
pub async fn run<T, W>(
    units: Vec<Unit<T>>,
    worker: W,
    concurrency_limit: Option<usize>,
) -> Result<BatchResult<W::Output>, OrchestratorError>
where
    T: Send + 'static,
    W: Worker<T> + 'static,
{
    let config = OrchestratorConfig {
        concurrency_limit,
        ..Default::default()
    };
    Orchestrator::new(config).run(units, Arc::new(worker)).await
}

fn check_unique_ids<T>(units: &[Unit<T>]) -> Result<(), OrchestratorError> {
    let mut seen = HashSet::with_capacity(units.len());
    for unit in units {
        if !seen.insert(unit.id.as_str()) {
            return Err(OrchestratorError::DuplicateUnitId(unit.id.clone()));
        }
    }
    Ok(())
}

/// Waits for an admission slot. Returns `None` if cancelled first.
async fn acquire(semaphore: &Arc<Semaphore>, cancel: &CancelSignal) -> Option<OwnedSemaphorePermit> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = Arc::clone(semaphore).acquire_owned() => permit.ok(),
    }
}

async fn execute_unit<T, W>(
    unit: Unit<T>,
    worker: Arc<W>,
    context: Arc<UnitContext>,
) -> Outcome<W::Output>
where
    T: Send + 'static,
    W: Worker<T> + 'static,
{
    let id = unit.id.clone();
    let stats = &context.stats;
    stats.queued.fetch_sub(1, Ordering::Relaxed);
    stats.active.fetch_add(1, Ordering::Relaxed);

    emit(
        &context.reporter,
        &BatchEvent::UnitStarted {
            batch_id: context.batch_id,
            id: id.clone(),
        },
    )
    .await;

    let work = AssertUnwindSafe(worker.process(unit)).catch_unwind();
    let bounded = async {
        match context.timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.map_err(|_| limit),
            None => Ok(work.await),
        }
    };

    let outcome = tokio::select! {
        biased;
        _ = context.cancel.cancelled() => Outcome::cancelled(id.clone()),
        result = bounded => match result {
            Ok(Ok(Ok(value))) => Outcome::success(id.clone(), value),
            Ok(Ok(Err(e))) => Outcome::failure(id.clone(), e.kind(), e.to_string()),
            Ok(Err(panic)) => Outcome::failure(
                id.clone(),
                ErrorKind::Panicked,
                format!("worker panicked: {}", panic_message(panic)),
            ),
            Err(limit) => Outcome::failure(
                id.clone(),
                ErrorKind::Timeout,
                format!("timed out after {}ms", limit.as_millis()),
            ),
        },
    };

    stats.active.fetch_sub(1, Ordering::Relaxed);
    stats.record(&outcome);

    emit(
        &context.reporter,
        &BatchEvent::unit_completed(context.batch_id, &outcome),
    )
    .await;

    outcome
}

/// Hands `event` to the reporter. A panicking reporter is logged and ignored.
async fn emit(reporter: &Arc<dyn Reporter>, event: &BatchEvent) {
    if let Err(panic) = AssertUnwindSafe(reporter.report(event))
        .catch_unwind()
        .await
    {
        warn!(
            batch_id = %event.batch_id(),
            event = event.event_type(),
            "Reporter panicked: {}",
            panic_message(panic)
        );
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::cancel_pair;
    use crate::reporter::NoopReporter;
    use crate::worker::{worker_fn, WorkerError};

    fn units(ids: &[&str]) -> Vec<Unit<()>> {
        ids.iter().map(|id| Unit::bare(*id)).collect()
    }

    fn echo() -> impl Worker<(), Output = String> {
        worker_fn(|unit: Unit<()>| async move { Ok::<_, WorkerError>(unit.id) })
    }

    #[test]
    fn test_check_unique_ids() {
        assert!(check_unique_ids(&units(&["a", "b", "c"])).is_ok());
        assert_eq!(
            check_unique_ids(&units(&["a", "b", "a"])),
            Err(OrchestratorError::DuplicateUnitId("a".to_string()))
        );
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("bang".to_string())), "bang");
        assert_eq!(panic_message(Box::new(42u8)), "unknown panic payload");
    }

    #[tokio::test]
    async fn test_run_preserves_order() {
        let result = run(units(&["a", "b", "c"]), echo(), Some(2)).await.unwrap();
        let ids: Vec<&str> = result.outcomes().iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(result.succeeded(), 3);
    }

    #[tokio::test]
    async fn test_zero_limit_fails_before_start() {
        let err = run(units(&["a"]), echo(), Some(0)).await.unwrap_err();
        assert_eq!(err, OrchestratorError::InvalidConcurrencyLimit(0));
    }

    #[tokio::test]
    async fn test_status_counts_after_run() {
        let orchestrator = Orchestrator::new(OrchestratorConfig::default().with_concurrency_limit(2))
            .with_reporter(Arc::new(NoopReporter));
        let worker = Arc::new(worker_fn(|unit: Unit<()>| async move {
            if unit.id == "bad" {
                Err(WorkerError::failed("nope"))
            } else {
                Ok(())
            }
        }));

        orchestrator
            .run(units(&["a", "bad", "c"]), worker)
            .await
            .unwrap();

        let status = orchestrator.status();
        assert_eq!(status.max_concurrent, Some(2));
        assert_eq!(status.active_units, 0);
        assert_eq!(status.queued_units, 0);
        assert_eq!(status.total_succeeded, 2);
        assert_eq!(status.total_failed, 1);
    }

    #[tokio::test]
    async fn test_cancel_before_run_cancels_everything() {
        let (handle, signal) = cancel_pair();
        handle.cancel();

        let orchestrator = Orchestrator::new(OrchestratorConfig::default())
            .with_reporter(Arc::new(NoopReporter));
        let result = orchestrator
            .run_with_cancel(units(&["a", "b"]), Arc::new(echo()), signal)
            .await
            .unwrap();

        assert_eq!(result.cancelled(), 2);
        assert_eq!(orchestrator.status().queued_units, 0);
    }

    #[tokio::test]
    async fn test_limit_above_semaphore_capacity_runs() {
        let result = run(units(&["a", "b"]), echo(), Some(usize::MAX)).await.unwrap();
        assert_eq!(result.succeeded(), 2);

        let config: OrchestratorConfig =
            toml::from_str("concurrency_limit = 9223372036854775807").unwrap();
        assert!(config.validate().is_ok());
        let result = Orchestrator::new(config)
            .with_reporter(Arc::new(NoopReporter))
            .run(units(&["a"]), Arc::new(echo()))
            .await
            .unwrap();
        assert_eq!(result.succeeded(), 1);
    }

    /// Panics on every unit completion and at batch end.
    struct ExplodingReporter;

    #[async_trait::async_trait]
    impl Reporter for ExplodingReporter {
        async fn report(&self, event: &BatchEvent) {
            if matches!(
                event,
                BatchEvent::UnitCompleted { .. } | BatchEvent::BatchFinished { .. }
            ) {
                panic!("sink exploded");
            }
        }
    }

    #[tokio::test]
    async fn test_panicking_reporter_does_not_change_outcomes() {
        let orchestrator = Orchestrator::new(OrchestratorConfig::default().with_concurrency_limit(1))
            .with_reporter(Arc::new(ExplodingReporter));

        let result = orchestrator
            .run(units(&["a", "b"]), Arc::new(echo()))
            .await
            .unwrap();

        assert_eq!(result.succeeded(), 2);
        assert_eq!(result.outcomes()[0], Outcome::success("a", "a".to_string()));

        let status = orchestrator.status();
        assert_eq!(status.active_units, 0);
        assert_eq!(status.total_succeeded, 2);
        assert_eq!(status.total_failed, 0);
    }
}
