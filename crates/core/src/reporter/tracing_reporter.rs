//! Reporter that writes one readable log line per event.

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::events::{BatchEvent, LogLevel};
use super::traits::Reporter;

/// Default reporter: logs each event through `tracing`.
///
/// Renders [`BatchEvent::to_record`]: info and success records at info,
/// warnings at warn and errors at error. The record's own level is kept in
/// the `record_level` field so successes stay distinguishable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

#[async_trait]
impl Reporter for TracingReporter {
    async fn report(&self, event: &BatchEvent) {
        let record = event.to_record();
        let batch_id = event.batch_id();
        let unit_id = event.unit_id();

        match record.level {
            LogLevel::Info | LogLevel::Success => {
                info!(%batch_id, unit_id, record_level = %record.level, "{}", record)
            }
            LogLevel::Warning => {
                warn!(%batch_id, unit_id, record_level = %record.level, "{}", record)
            }
            LogLevel::Error => {
                error!(%batch_id, unit_id, record_level = %record.level, "{}", record)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{BatchSummary, ErrorKind, Outcome};
    use std::io;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    /// Captures formatted log output.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn line_containing(&self, needle: &str) -> String {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .find(|line| line.contains(needle))
                .unwrap_or_else(|| panic!("no log line contains {needle:?}"))
                .to_string()
        }
    }

    #[tokio::test]
    async fn test_reports_every_event_kind() {
        let reporter = TracingReporter;
        let batch_id = Uuid::new_v4();
        let failed: Outcome<()> = Outcome::failure("b", ErrorKind::Io, "gone");

        reporter
            .report(&BatchEvent::BatchStarted { batch_id, count: 1 })
            .await;
        reporter
            .report(&BatchEvent::UnitStarted {
                batch_id,
                id: "b".to_string(),
            })
            .await;
        reporter
            .report(&BatchEvent::unit_completed(batch_id, &failed))
            .await;
        reporter
            .report(&BatchEvent::BatchFinished {
                batch_id,
                summary: BatchSummary::default(),
            })
            .await;
    }

    #[tokio::test]
    async fn test_levels_follow_record() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let reporter = TracingReporter;
        let batch_id = Uuid::nil();
        let ok: Outcome<()> = Outcome::success("img1", ());
        let failed: Outcome<()> = Outcome::failure("img3", ErrorKind::Io, "I/O error");
        let cancelled: Outcome<()> = Outcome::cancelled("img5");

        for outcome in [&ok, &failed, &cancelled] {
            reporter
                .report(&BatchEvent::unit_completed(batch_id, outcome))
                .await;
        }
        reporter
            .report(&BatchEvent::BatchFinished {
                batch_id,
                summary: BatchSummary {
                    total: 5,
                    succeeded: 3,
                    failed: 1,
                    cancelled: 1,
                    duration_ms: 2000,
                },
            })
            .await;

        let success = buffer.line_containing("Finished processing for img1");
        assert!(success.contains("INFO"), "{success}");
        assert!(success.contains("record_level=success"), "{success}");

        let failure = buffer.line_containing("Processing failed for img3");
        assert!(failure.contains("ERROR"), "{failure}");
        assert!(failure.contains("reason=io"), "{failure}");

        let cancel = buffer.line_containing("Processing cancelled for img5");
        assert!(cancel.contains("WARN"), "{cancel}");

        let finished = buffer.line_containing("--- Finished batch in 2.00 seconds ---");
        assert!(finished.contains("WARN"), "{finished}");
        assert!(finished.contains("failed=1"), "{finished}");
    }
}
