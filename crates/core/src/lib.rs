pub mod config;
pub mod metrics;
pub mod notifier;
pub mod orchestrator;
pub mod reporter;
pub mod testing;
pub mod unit;
pub mod worker;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DemoConfig,
    LogFormat, LoggingConfig, NotifierConfig,
};
pub use metrics::{encode_metrics, MetricsReporter};
pub use notifier::{
    DeliveryStatus, LogNotifier, NotificationReceipt, NotificationRequest, Notifier,
    NotifierError,
};
pub use orchestrator::{
    cancel_pair, run, CancelHandle, CancelSignal, Orchestrator, OrchestratorConfig,
    OrchestratorError, OrchestratorStatus,
};
pub use reporter::{
    create_event_channel, BatchEvent, ChannelReporter, CompositeReporter, EventEnvelope,
    LogLevel, LogRecord, NoopReporter, Reporter, TracingReporter,
};
pub use unit::{BatchResult, BatchSummary, ErrorKind, Outcome, OutcomeStatus, Unit};
pub use worker::{worker_fn, FnWorker, Worker, WorkerError};
