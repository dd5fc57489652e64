//! Application view engine
//!
//! Reconstructs composite applications (controller, pods, services, volume
//! claims) from independently listed Kubernetes resources.

pub mod config;
pub mod kubernetes;
pub mod logging;

pub use appview_common::Application;
pub use config::{ClusterConfig, ConfigError, EngineConfig};
pub use kubernetes::{ApplicationManager, ClusterAccess, K8sError, K8sResult};
#[cfg(feature = "kubernetes")]
pub use kubernetes::ClusterRegistry;
pub use logging::LoggingConfig;
