//! Prometheus metrics for batch runs.
//!
//! [`MetricsReporter`] is a [`Reporter`] that turns lifecycle events into:
//! - Batches run and their durations
//! - Units started, in flight, and completed by status/reason
//!
//! Metrics live in a caller-supplied [`Registry`]; nothing is registered
//! globally.

use async_trait::async_trait;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::reporter::{BatchEvent, Reporter};

/// Reporter that records batch and unit metrics.
#[derive(Clone)]
pub struct MetricsReporter {
    batches: IntCounter,
    batch_duration: Histogram,
    units_started: IntCounter,
    units_in_flight: IntGauge,
    units_completed: IntCounterVec,
}

impl MetricsReporter {
    /// Creates the metrics without registering them.
    pub fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            batches: IntCounter::new("fanout_batches_total", "Total batches run")?,
            batch_duration: Histogram::with_opts(
                HistogramOpts::new("fanout_batch_duration_seconds", "Duration of batch runs")
                    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 300.0]),
            )?,
            units_started: IntCounter::new("fanout_units_started_total", "Total units started")?,
            units_in_flight: IntGauge::new(
                "fanout_units_in_flight",
                "Units whose worker is currently running",
            )?,
            units_completed: IntCounterVec::new(
                Opts::new("fanout_units_completed_total", "Total units completed"),
                &["status", "reason"], // reason is empty for success/cancelled
            )?,
        })
    }

    /// Creates the metrics and registers them in `registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let reporter = Self::new()?;
        registry.register(Box::new(reporter.batches.clone()))?;
        registry.register(Box::new(reporter.batch_duration.clone()))?;
        registry.register(Box::new(reporter.units_started.clone()))?;
        registry.register(Box::new(reporter.units_in_flight.clone()))?;
        registry.register(Box::new(reporter.units_completed.clone()))?;
        Ok(reporter)
    }

    pub fn batches(&self) -> u64 {
        self.batches.get()
    }

    pub fn units_started(&self) -> u64 {
        self.units_started.get()
    }

    pub fn units_in_flight(&self) -> i64 {
        self.units_in_flight.get()
    }

    /// Completed units for a status and reason (`""` when there is none).
    pub fn units_completed(&self, status: &str, reason: &str) -> u64 {
        self.units_completed
            .with_label_values(&[status, reason])
            .get()
    }
}

#[async_trait]
impl Reporter for MetricsReporter {
    async fn report(&self, event: &BatchEvent) {
        match event {
            BatchEvent::BatchStarted { .. } => {}
            BatchEvent::UnitStarted { .. } => {
                self.units_started.inc();
                self.units_in_flight.inc();
            }
            BatchEvent::UnitCompleted { status, reason, .. } => {
                self.units_in_flight.dec();
                let reason = reason.map(|r| r.as_str()).unwrap_or("");
                self.units_completed
                    .with_label_values(&[status.as_str(), reason])
                    .inc();
            }
            BatchEvent::BatchFinished { summary, .. } => {
                self.batches.inc();
                self.batch_duration
                    .observe(summary.duration_ms as f64 / 1000.0);
            }
        }
    }
}

/// Encode all metrics in `registry` as Prometheus text format.
pub fn encode_metrics(registry: &Registry) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{BatchSummary, ErrorKind, Outcome};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_counts_unit_lifecycle() {
        let metrics = MetricsReporter::new().unwrap();
        let batch_id = Uuid::nil();

        for id in ["a", "b"] {
            metrics
                .report(&BatchEvent::UnitStarted {
                    batch_id,
                    id: id.to_string(),
                })
                .await;
        }
        assert_eq!(metrics.units_in_flight(), 2);

        let ok: Outcome<()> = Outcome::success("a", ());
        let failed: Outcome<()> = Outcome::failure("b", ErrorKind::Io, "disk");
        metrics.report(&BatchEvent::unit_completed(batch_id, &ok)).await;
        metrics
            .report(&BatchEvent::unit_completed(batch_id, &failed))
            .await;
        metrics
            .report(&BatchEvent::BatchFinished {
                batch_id,
                summary: BatchSummary::default(),
            })
            .await;

        assert_eq!(metrics.units_started(), 2);
        assert_eq!(metrics.units_in_flight(), 0);
        assert_eq!(metrics.units_completed("success", ""), 1);
        assert_eq!(metrics.units_completed("failure", "io"), 1);
        assert_eq!(metrics.batches(), 1);
    }

    #[test]
    fn test_register_and_encode() {
        let registry = Registry::new();
        let metrics = MetricsReporter::register(&registry).unwrap();
        metrics.units_started.inc();

        let text = encode_metrics(&registry).unwrap();
        assert!(text.contains("fanout_units_started_total 1"));
        assert!(text.contains("fanout_batches_total 0"));
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        MetricsReporter::register(&registry).unwrap();
        assert!(MetricsReporter::register(&registry).is_err());
    }
}
