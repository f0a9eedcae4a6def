mod jobs;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::Registry;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fanout_core::{
    cancel_pair, encode_metrics, load_config, validate_config, CompositeReporter, Config,
    LogFormat, LogNotifier, LoggingConfig, MetricsReporter, Orchestrator, Outcome,
    TracingReporter, Unit,
};

use jobs::ImageJob;

/// Config file used when neither an argument nor `FANOUT_CONFIG` names one
const DEFAULT_CONFIG_PATH: &str = "fanout.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be initialized yet
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let explicit_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FANOUT_CONFIG").ok())
        .map(PathBuf::from);

    // Load configuration
    let config = match &explicit_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))?
        }
        None => Config::default(),
    };

    init_logging(&config.logging);

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Concurrency limit: {:?}", config.orchestrator.concurrency_limit);
    info!("Unit timeout: {:?}", config.orchestrator.unit_timeout());

    // Metrics + readable log lines
    let registry = Registry::new();
    let metrics =
        MetricsReporter::register(&registry).context("Failed to register batch metrics")?;
    let reporter = CompositeReporter::new()
        .with(Arc::new(TracingReporter))
        .with(Arc::new(metrics));

    let mut job = ImageJob::from_config(&config.demo);
    if config.notifier.enabled {
        info!("Notifications enabled for {}", config.notifier.recipient);
        job = job.with_notifier(
            Arc::new(LogNotifier::new(config.notifier.sender.clone())),
            config.notifier.recipient.clone(),
        );
    }

    let orchestrator =
        Orchestrator::new(config.orchestrator.clone()).with_reporter(Arc::new(reporter));
    let units: Vec<Unit<()>> = config
        .demo
        .image_ids
        .iter()
        .map(|id| Unit::bare(id.as_str()))
        .collect();

    // Cancel the batch on Ctrl+C
    let (cancel_handle, cancel_signal) = cancel_pair();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling batch");
            cancel_handle.cancel();
        }
    });

    let result = orchestrator
        .run_with_cancel(units, Arc::new(job), cancel_signal)
        .await
        .context("Batch rejected")?;

    let processed: Vec<&str> = result.successes().map(|(_, file)| file.as_str()).collect();
    info!("Results: {:?}", processed);
    for outcome in result.failures() {
        if let Outcome::Failure { id, reason, detail } = outcome {
            error!(unit_id = %id, %reason, "{}", detail);
        }
    }
    info!(
        "Summary: {}",
        serde_json::to_string(&result.summary()).context("Failed to serialize summary")?
    );

    match encode_metrics(&registry) {
        Ok(text) => debug!("Metrics:\n{}", text),
        Err(e) => warn!("Failed to encode metrics: {}", e),
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
