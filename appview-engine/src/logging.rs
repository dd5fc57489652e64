//! Logging setup
//!
//! Console output plus an optional rolling log file, both behind one
//! `EnvFilter`. `RUST_LOG` takes precedence over the configured level.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "appview.log";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Write a log file in addition to the console
    pub file_logging_enabled: bool,
    pub rotation: LogRotation,
    /// JSON lines on the console instead of human-readable output
    pub json_format: bool,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/appview"),
            file_logging_enabled: false,
            rotation: LogRotation::Daily,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Install the global subscriber.
    ///
    /// With file logging enabled the returned guard must be kept alive for
    /// buffered lines to reach the file.
    pub fn init(&self) -> anyhow::Result<Option<WorkerGuard>> {
        let env_filter = self.env_filter()?;

        let console_layer = if self.json_format {
            fmt::layer().json().with_writer(io::stdout).boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(io::stdout)
                .boxed()
        };

        let (file_layer, guard) = if self.file_logging_enabled {
            let appender = match self.rotation {
                LogRotation::Hourly => rolling::hourly(&self.log_dir, LOG_FILE_PREFIX),
                LogRotation::Daily => rolling::daily(&self.log_dir, LOG_FILE_PREFIX),
                LogRotation::Never => rolling::never(&self.log_dir, LOG_FILE_PREFIX),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer()
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(writer);
            (Some(layer), Some(guard))
        } else {
            (None, None)
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .context("a global tracing subscriber is already installed")?;

        tracing::info!("Logging initialized - level: {}", self.level);

        Ok(guard)
    }

    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .with_context(|| format!("invalid log level '{}'", self.level)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.file_logging_enabled);
        assert_eq!(config.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_level_directives() {
        let config = LoggingConfig {
            level: "appview_engine=debug,kube=warn".to_string(),
            ..Default::default()
        };
        assert!(EnvFilter::try_new(&config.level).is_ok());
    }

    #[test]
    fn test_rotation_deserializes_lowercase() {
        let config: LoggingConfig = toml::from_str("rotation = \"hourly\"").unwrap();
        assert_eq!(config.rotation, LogRotation::Hourly);
        assert_eq!(config.level, "info");
    }
}
