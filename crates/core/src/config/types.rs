use serde::{Deserialize, Serialize};

use crate::notifier::DEFAULT_SENDER;
use crate::orchestrator::OrchestratorConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive (overridden by `RUST_LOG`)
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines from the `tracing_subscriber` fmt layer
    #[default]
    Pretty,
    /// One JSON object per record, for log collectors
    Json,
}

/// Notification configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Notify `recipient` after each processed unit
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: default_sender(),
            recipient: String::new(),
        }
    }
}

fn default_sender() -> String {
    DEFAULT_SENDER.to_string()
}

/// Image processing demo batch
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DemoConfig {
    /// Images to process, in submission order
    #[serde(default = "default_image_ids")]
    pub image_ids: Vec<String>,
    /// Simulated processing time per image (milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Images whose processing fails with an I/O error
    #[serde(default)]
    pub fail_ids: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            image_ids: default_image_ids(),
            delay_ms: default_delay_ms(),
            fail_ids: Vec::new(),
        }
    }
}

fn default_image_ids() -> Vec<String> {
    (1..=5).map(|i| format!("img{}", i)).collect()
}

fn default_delay_ms() -> u64 {
    2000
}
