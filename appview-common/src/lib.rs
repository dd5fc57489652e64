//! Common types shared between appview-engine and its API consumers
//!
//! These are the read-only shapes of the application view. They are plain
//! serializable snapshots; nothing here talks to a cluster.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Workload controller kind an application was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationType {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deployment => write!(f, "Deployment"),
            Self::StatefulSet => write!(f, "StatefulSet"),
            Self::DaemonSet => write!(f, "DaemonSet"),
        }
    }
}

/// Pod lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    /// Parse the phase string reported by the API server.
    ///
    /// Anything unrecognised (including a missing phase) is `Unknown`.
    pub fn from_phase(phase: Option<&str>) -> Self {
        match phase {
            Some("Pending") => Self::Pending,
            Some("Running") => Self::Running,
            Some("Succeeded") => Self::Succeeded,
            Some("Failed") => Self::Failed,
            _ => Self::Unknown,
        }
    }

    /// Running and Succeeded pods count as healthy; every other phase does not.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Running | Self::Succeeded)
    }
}

impl Default for PodPhase {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for PodPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Running => write!(f, "Running"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    ClusterIP,
    NodePort,
    LoadBalancer,
    ExternalName,
}

impl Default for ServiceType {
    fn default() -> Self {
        Self::ClusterIP
    }
}

/// Service port definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePort {
    pub name: Option<String>,
    pub protocol: String,
    pub port: i32,
    pub target_port: String,
    pub node_port: Option<i32>,
}

/// Simplified service information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub namespace: String,
    pub service_type: ServiceType,
    pub cluster_ip: Option<String>,
    pub external_ip: Option<String>,
    pub ports: Vec<ServicePort>,
    /// Equality selector; absent and empty are the same thing here
    pub selector: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
    pub created_at: Option<String>,
}

/// Simplified PersistentVolumeClaim information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PvcInfo {
    pub name: String,
    pub namespace: String,
    pub status: String,
    pub volume_name: Option<String>,
    pub storage_class: Option<String>,
    pub access_modes: Vec<String>,
    pub capacity: Option<String>,
    pub requested_capacity: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub created_at: Option<String>,
}

/// Simplified StorageClass information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageClassInfo {
    pub name: String,
    pub provisioner: String,
    pub reclaim_policy: Option<String>,
    pub volume_binding_mode: Option<String>,
    pub allow_volume_expansion: bool,
    pub parameters: BTreeMap<String, String>,
    pub is_default: bool,
    pub created_at: Option<String>,
}

/// Container port declared in a pod template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerPort {
    pub name: Option<String>,
    pub container_port: i32,
    pub protocol: String,
}

/// Container as declared in the controller's pod template (desired state)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerTemplate {
    pub name: String,
    pub image: String,
    pub ports: Vec<ContainerPort>,
    pub requests: BTreeMap<String, String>,
    pub limits: BTreeMap<String, String>,
}

/// Most recent pod condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodCondition {
    pub condition_type: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub last_transition_time: Option<String>,
}

/// Live view of a pod belonging to an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPod {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    /// Ready containers over total, e.g. `"1/2"`
    pub ready: String,
    /// Restart count, e.g. `"3"` or `"3 (5m ago)"`
    pub restarts: String,
    pub node_name: Option<String>,
    pub pod_ip: Option<String>,
    pub age: Option<String>,
    pub last_condition: Option<PodCondition>,
    pub labels: BTreeMap<String, String>,
}

/// A claim mounted by the application, with its StorageClass when it resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationVolume {
    pub claim: PvcInfo,
    pub storage_class: Option<StorageClassInfo>,
}

/// Composite application view built from one workload controller
///
/// `containers` is what the pod template asks for; `pods` is what is actually
/// running. The two are allowed to disagree (for example mid-rollout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub app_type: ApplicationType,
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    /// Desired replicas. Always 1 for DaemonSets, see `replicas_are_synthetic`.
    pub replicas: i32,
    pub healthy_count: i32,
    pub containers: Vec<ContainerTemplate>,
    pub pods: Vec<ApplicationPod>,
    pub services: Vec<ServiceInfo>,
    pub persistent_volume_claims: Vec<ApplicationVolume>,
}

impl Application {
    /// DaemonSets have no replica count; theirs is a presence marker and must
    /// not be compared against `healthy_count`.
    pub fn replicas_are_synthetic(&self) -> bool {
        self.app_type == ApplicationType::DaemonSet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pod_phase_parsing() {
        assert_eq!(PodPhase::from_phase(Some("Running")), PodPhase::Running);
        assert_eq!(PodPhase::from_phase(Some("Succeeded")), PodPhase::Succeeded);
        assert_eq!(PodPhase::from_phase(Some("Evicted")), PodPhase::Unknown);
        assert_eq!(PodPhase::from_phase(None), PodPhase::Unknown);
    }

    #[test]
    fn test_pod_phase_health() {
        assert!(PodPhase::Running.is_healthy());
        assert!(PodPhase::Succeeded.is_healthy());
        assert!(!PodPhase::Pending.is_healthy());
        assert!(!PodPhase::Failed.is_healthy());
        assert!(!PodPhase::Unknown.is_healthy());
    }

    #[test]
    fn test_application_serialization() {
        let app = Application {
            app_type: ApplicationType::DaemonSet,
            name: "node-exporter".to_string(),
            namespace: "monitoring".to_string(),
            labels: BTreeMap::new(),
            replicas: 1,
            healthy_count: 3,
            containers: vec![],
            pods: vec![],
            services: vec![],
            persistent_volume_claims: vec![],
        };

        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["app_type"], "DaemonSet");
        assert_eq!(json["healthy_count"], 3);
        assert!(app.replicas_are_synthetic());

        let back: Application = serde_json::from_value(json).unwrap();
        assert_eq!(back, app);
    }
}
