//! Workload controller view
//!
//! Deployments, StatefulSets and DaemonSets differ in their status fields but
//! expose the same pod-template facts. `WorkloadController` gives correlation
//! and building a single shape to work with.

use std::collections::BTreeMap;

use super::selector::Selector;
use crate::kubernetes::error::{K8sError, K8sResult};
use crate::kubernetes::types::{
    ContainerTemplate, DaemonSetInfo, DeploymentInfo, LabelSelector, PodTemplate,
    StatefulSetInfo, VolumeInfo, WorkloadKind,
};

/// Any controller an application can be derived from
#[derive(Debug, Clone)]
pub enum WorkloadController {
    Deployment(DeploymentInfo),
    StatefulSet(StatefulSetInfo),
    DaemonSet(DaemonSetInfo),
}

impl WorkloadController {
    pub fn kind(&self) -> WorkloadKind {
        match self {
            Self::Deployment(_) => WorkloadKind::Deployment,
            Self::StatefulSet(_) => WorkloadKind::StatefulSet,
            Self::DaemonSet(_) => WorkloadKind::DaemonSet,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Deployment(d) => &d.name,
            Self::StatefulSet(s) => &s.name,
            Self::DaemonSet(d) => &d.name,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::Deployment(d) => &d.namespace,
            Self::StatefulSet(s) => &s.namespace,
            Self::DaemonSet(d) => &d.namespace,
        }
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        match self {
            Self::Deployment(d) => &d.labels,
            Self::StatefulSet(s) => &s.labels,
            Self::DaemonSet(d) => &d.labels,
        }
    }

    /// Raw selector document, `None` when the controller has none
    pub fn selector(&self) -> Option<&LabelSelector> {
        match self {
            Self::Deployment(d) => d.selector.as_ref(),
            Self::StatefulSet(s) => s.selector.as_ref(),
            Self::DaemonSet(d) => d.selector.as_ref(),
        }
    }

    fn template(&self) -> &PodTemplate {
        match self {
            Self::Deployment(d) => &d.template,
            Self::StatefulSet(s) => &s.template,
            Self::DaemonSet(d) => &d.template,
        }
    }

    pub fn pod_template_volumes(&self) -> &[VolumeInfo] {
        &self.template().volumes
    }

    pub fn pod_template_containers(&self) -> &[ContainerTemplate] {
        &self.template().containers
    }

    /// Desired replica count. DaemonSets have none.
    ///
    /// An unset field on a Deployment or StatefulSet means the API default, 1.
    pub fn desired_replicas(&self) -> Option<i32> {
        match self {
            Self::Deployment(d) => Some(d.replicas.unwrap_or(1)),
            Self::StatefulSet(s) => Some(s.replicas.unwrap_or(1)),
            Self::DaemonSet(_) => None,
        }
    }

    /// Compile the controller's own selector into a predicate
    pub fn compile_selector(&self) -> K8sResult<Selector> {
        Selector::from_label_selector(self.selector()).map_err(|e| K8sError::SelectorInvalid {
            kind: self.kind().to_string(),
            name: self.name().to_string(),
            namespace: self.namespace().to_string(),
            reason: e.to_string(),
        })
    }
}

impl From<DeploymentInfo> for WorkloadController {
    fn from(info: DeploymentInfo) -> Self {
        Self::Deployment(info)
    }
}

impl From<StatefulSetInfo> for WorkloadController {
    fn from(info: StatefulSetInfo) -> Self {
        Self::StatefulSet(info)
    }
}

impl From<DaemonSetInfo> for WorkloadController {
    fn from(info: DaemonSetInfo) -> Self {
        Self::DaemonSet(info)
    }
}
