//! Cluster access seam
//!
//! The engine never talks to an API server directly; it reads through this
//! trait. `ClusterRegistry` implements it on top of kube-rs, tests implement it
//! in memory.

use async_trait::async_trait;

use super::error::K8sResult;
use super::types::{
    DaemonSetInfo, DeploymentInfo, PodInfo, PvcInfo, ServiceInfo, StatefulSetInfo,
    StorageClassInfo,
};

/// Read-only access to the resources of one or more clusters.
///
/// An empty `namespace` means all namespaces. `get_*` calls report a missing
/// object as `K8sError::ResourceNotFound`.
#[async_trait]
pub trait ClusterAccess: Send + Sync {
    async fn list_deployments(&self, cluster: &str, namespace: &str)
        -> K8sResult<Vec<DeploymentInfo>>;

    async fn get_deployment(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<DeploymentInfo>;

    async fn list_statefulsets(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<StatefulSetInfo>>;

    async fn get_statefulset(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<StatefulSetInfo>;

    async fn list_daemonsets(&self, cluster: &str, namespace: &str)
        -> K8sResult<Vec<DaemonSetInfo>>;

    async fn get_daemonset(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<DaemonSetInfo>;

    async fn list_services(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<ServiceInfo>>;

    async fn list_pods(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<PodInfo>>;

    async fn list_pvcs(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<PvcInfo>>;

    /// StorageClasses are cluster-scoped
    async fn list_storage_classes(&self, cluster: &str) -> K8sResult<Vec<StorageClassInfo>>;
}
