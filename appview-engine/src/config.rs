//! Configuration management for the application view engine
//!
//! Settings are resolved in this order, later wins:
//! 1. Default values
//! 2. Configuration file (TOML format)
//! 3. Environment variables

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LoggingConfig;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    /// Clusters to connect at startup
    pub clusters: Vec<ClusterConfig>,
}

/// How to reach one cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Identifier used in every engine call
    pub id: String,
    /// Display name, defaults to the id
    pub name: Option<String>,
    /// Path to a kubeconfig file
    pub kubeconfig: Option<PathBuf>,
    /// Context within the kubeconfig; the current context when unset
    pub context: Option<String>,
    /// Use the service account of the pod the engine runs in
    pub in_cluster: bool,
}

impl ClusterConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Configuration validation failed
    #[error("Config validation failed: {0}")]
    Validation(String),
}

impl EngineConfig {
    /// Load configuration from environment variables and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("APPVIEW_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/appview/config.toml")),
            Some(PathBuf::from("./appview.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(level) = var("APPVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(dir) = var("APPVIEW_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(dir);
        }
        if let Some(json) = var("APPVIEW_LOG_JSON") {
            self.logging.json_format = json.parse().unwrap_or(false);
        }
        if let Some(enabled) = var("APPVIEW_FILE_LOGGING") {
            self.logging.file_logging_enabled = enabled.parse().unwrap_or(false);
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = Self {
            logging: LoggingConfig::default(),
            clusters: vec![
                ClusterConfig {
                    id: "local".to_string(),
                    name: Some("Local k3s".to_string()),
                    kubeconfig: Some(PathBuf::from("/etc/rancher/k3s/k3s.yaml")),
                    context: None,
                    in_cluster: false,
                },
                ClusterConfig {
                    id: "self".to_string(),
                    in_cluster: true,
                    ..Default::default()
                },
            ],
        };
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for cluster in &self.clusters {
            if cluster.id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Cluster id cannot be empty".to_string(),
                ));
            }
            if !seen.insert(cluster.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate cluster id '{}'",
                    cluster.id
                )));
            }
            if cluster.kubeconfig.is_none() && !cluster.in_cluster {
                return Err(ConfigError::Validation(format!(
                    "Cluster '{}' needs a kubeconfig or in_cluster = true",
                    cluster.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogRotation;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.clusters.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[logging]
level = "debug"
rotation = "never"

[[clusters]]
id = "prod"
kubeconfig = "/etc/appview/prod.yaml"
context = "prod-admin"

[[clusters]]
id = "self"
in_cluster = true
"#
        )
        .unwrap();

        let config = EngineConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotation, LogRotation::Never);
        assert_eq!(config.clusters.len(), 2);
        assert_eq!(config.clusters[0].context.as_deref(), Some("prod-admin"));
        assert_eq!(config.clusters[0].display_name(), "prod");
        assert!(config.clusters[1].in_cluster);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_errors() {
        let missing = EngineConfig::load_from_file(Path::new("/nonexistent/appview.toml"));
        assert!(matches!(missing, Err(ConfigError::FileRead(..))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[clusters]]\nid = 42\n").unwrap();
        let invalid = EngineConfig::load_from_file(file.path());
        assert!(matches!(invalid, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("APPVIEW_LOG_LEVEL", "warn"),
            ("APPVIEW_LOG_DIR", "/tmp/appview"),
            ("APPVIEW_LOG_JSON", "true"),
            ("APPVIEW_FILE_LOGGING", "true"),
        ]);

        let mut config = EngineConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.log_dir, PathBuf::from("/tmp/appview"));
        assert!(config.logging.json_format);
        assert!(config.logging.file_logging_enabled);
    }

    #[test]
    fn test_config_validation() {
        let cluster = |id: &str| ClusterConfig {
            id: id.to_string(),
            in_cluster: true,
            ..Default::default()
        };

        let empty_id = EngineConfig {
            clusters: vec![cluster(" ")],
            ..Default::default()
        };
        assert!(empty_id.validate().is_err());

        let duplicate = EngineConfig {
            clusters: vec![cluster("a"), cluster("a")],
            ..Default::default()
        };
        assert!(duplicate.validate().is_err());

        let unreachable = EngineConfig {
            clusters: vec![ClusterConfig {
                id: "a".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(unreachable.validate().is_err());
    }

    #[test]
    fn test_generate_sample_config() {
        let sample = EngineConfig::generate_sample();
        assert!(sample.contains("[logging]"));
        assert!(sample.contains("[[clusters]]"));

        let parsed: EngineConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.clusters.len(), 2);
        assert!(parsed.validate().is_ok());
    }
}
