//! Reporting of batch lifecycle events.
//!
//! The orchestrator emits a [`BatchEvent`] for every lifecycle step and hands
//! it to an injected [`Reporter`]. Reporters render, forward or discard the
//! event; they have no influence on outcomes.
//!
//! Available reporters:
//! - [`TracingReporter`]: one readable log line per event (default)
//! - [`ChannelReporter`]: forwards timestamped envelopes over an mpsc channel
//! - [`CompositeReporter`]: fans each event out to several reporters
//! - [`NoopReporter`]: discards everything
//! - [`crate::metrics::MetricsReporter`]: Prometheus counters

mod channel;
mod composite;
mod events;
mod traits;
mod tracing_reporter;

pub use channel::{create_event_channel, ChannelReporter, EventEnvelope};
pub use composite::CompositeReporter;
pub use events::{BatchEvent, LogLevel, LogRecord};
pub use traits::{NoopReporter, Reporter};
pub use tracing_reporter::TracingReporter;
