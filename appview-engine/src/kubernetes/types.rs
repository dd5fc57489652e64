//! Kubernetes snapshot types for the application view
//!
//! Simplified, request-scoped representations of the cluster resources the
//! engine correlates. Shapes that are also part of the output live in
//! `appview-common` and are re-exported here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use appview_common::{
    Application, ApplicationPod, ApplicationType, ApplicationVolume, ContainerPort,
    ContainerTemplate, PodCondition, PodPhase, PvcInfo, ServiceInfo, ServicePort, ServiceType,
    StorageClassInfo,
};

/// Workload controller kinds an application can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl WorkloadKind {
    /// Order in which a name is probed when resolving a single application
    pub const PRECEDENCE: [WorkloadKind; 3] = [
        WorkloadKind::Deployment,
        WorkloadKind::StatefulSet,
        WorkloadKind::DaemonSet,
    ];

    /// Plural resource name, as used by the API server
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Deployment => "deployments",
            Self::StatefulSet => "statefulsets",
            Self::DaemonSet => "daemonsets",
        }
    }
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deployment => write!(f, "Deployment"),
            Self::StatefulSet => write!(f, "StatefulSet"),
            Self::DaemonSet => write!(f, "DaemonSet"),
        }
    }
}

impl From<WorkloadKind> for ApplicationType {
    fn from(kind: WorkloadKind) -> Self {
        match kind {
            WorkloadKind::Deployment => ApplicationType::Deployment,
            WorkloadKind::StatefulSet => ApplicationType::StatefulSet,
            WorkloadKind::DaemonSet => ApplicationType::DaemonSet,
        }
    }
}

/// Label selector document, in the API server's shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelSelector {
    pub match_labels: BTreeMap<String, String>,
    pub match_expressions: Vec<LabelSelectorRequirement>,
}

impl LabelSelector {
    /// Selector made only of equality terms
    pub fn from_labels<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            match_labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            match_expressions: Vec::new(),
        }
    }
}

/// Set-based selector term (`In`, `NotIn`, `Exists`, `DoesNotExist`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: String,
    pub values: Vec<String>,
}

/// Pod-template volume; only the PVC reference matters for correlation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub name: String,
    pub claim_name: Option<String>,
}

/// Pod template shared by all controller kinds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodTemplate {
    pub labels: BTreeMap<String, String>,
    pub containers: Vec<ContainerTemplate>,
    pub volumes: Vec<VolumeInfo>,
}

/// Simplified deployment information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    /// `None` only when the object came back without a spec
    pub selector: Option<LabelSelector>,
    pub replicas: Option<i32>,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub updated_replicas: i32,
    pub strategy: String,
    pub template: PodTemplate,
    pub created_at: Option<String>,
}

/// Simplified StatefulSet information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatefulSetInfo {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub selector: Option<LabelSelector>,
    pub replicas: Option<i32>,
    pub ready_replicas: i32,
    pub current_replicas: i32,
    pub updated_replicas: i32,
    pub service_name: Option<String>,
    pub pod_management_policy: String,
    pub update_strategy: String,
    pub template: PodTemplate,
    pub created_at: Option<String>,
}

/// Simplified DaemonSet information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonSetInfo {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub selector: Option<LabelSelector>,
    pub desired_number_scheduled: i32,
    pub current_number_scheduled: i32,
    pub number_ready: i32,
    pub number_available: i32,
    pub number_misscheduled: i32,
    pub update_strategy: String,
    pub template: PodTemplate,
    pub created_at: Option<String>,
}

/// Simplified pod information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    pub node_name: Option<String>,
    pub pod_ip: Option<String>,
    pub containers: Vec<ContainerInfo>,
    pub labels: BTreeMap<String, String>,
    pub last_condition: Option<PodCondition>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Live container status within a pod
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restart_count: i32,
    /// When the previous instance of this container terminated, if it did
    pub last_terminated_at: Option<DateTime<Utc>>,
}
