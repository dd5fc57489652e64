//! Concurrent collection fetching
//!
//! One fan-out per request: every collection is requested at once and joined
//! with `try_join!`. The first failure returns immediately and drops the
//! remaining in-flight requests, so callers either get every collection or an
//! error, never a partial set.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use super::controller::WorkloadController;
use crate::kubernetes::access::ClusterAccess;
use crate::kubernetes::error::{K8sError, K8sResult};
use crate::kubernetes::types::{PodInfo, PvcInfo, ServiceInfo, StorageClassInfo, WorkloadKind};

/// What to fetch: a cluster, a namespace (empty for all) and an optional name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchScope {
    pub cluster: String,
    pub namespace: String,
    pub name: Option<String>,
}

impl FetchScope {
    pub fn list(cluster: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            namespace: namespace.into(),
            name: None,
        }
    }

    pub fn named(
        cluster: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            namespace: namespace.into(),
            name: Some(name.into()),
        }
    }
}

/// Collections every controller is correlated against
#[derive(Debug, Clone, Default)]
pub struct SiblingCollections {
    pub services: Vec<ServiceInfo>,
    pub pods: Vec<PodInfo>,
    pub pvcs: Vec<PvcInfo>,
    pub storage_classes: Vec<StorageClassInfo>,
}

/// Result of one fan-out: the controllers plus their siblings
#[derive(Debug, Clone, Default)]
pub struct FetchedResources {
    pub controllers: Vec<WorkloadController>,
    pub siblings: SiblingCollections,
}

/// Fetches resource collections through a `ClusterAccess`
#[derive(Clone)]
pub struct CollectionFetcher {
    access: Arc<dyn ClusterAccess>,
}

impl CollectionFetcher {
    pub fn new(access: Arc<dyn ClusterAccess>) -> Self {
        Self { access }
    }

    /// Fetch all three controller kinds and their siblings in one fan-out
    pub async fn fetch_all(&self, scope: &FetchScope) -> K8sResult<FetchedResources> {
        debug!(
            "Fetching all workloads in cluster {} namespace '{}'",
            scope.cluster, scope.namespace
        );

        let (deployments, statefulsets, daemonsets, services, pods, pvcs, storage_classes) = tokio::try_join!(
            self.controllers(WorkloadKind::Deployment, scope),
            self.controllers(WorkloadKind::StatefulSet, scope),
            self.controllers(WorkloadKind::DaemonSet, scope),
            self.services(scope),
            self.pods(scope),
            self.pvcs(scope),
            self.storage_classes(scope),
        )?;

        let mut controllers = deployments;
        controllers.extend(statefulsets);
        controllers.extend(daemonsets);

        Ok(FetchedResources {
            controllers,
            siblings: SiblingCollections {
                services,
                pods,
                pvcs,
                storage_classes,
            },
        })
    }

    /// Fetch one controller kind and its siblings in one fan-out
    pub async fn fetch_kind(
        &self,
        kind: WorkloadKind,
        scope: &FetchScope,
    ) -> K8sResult<FetchedResources> {
        debug!(
            "Fetching {} workloads in cluster {} namespace '{}' (name: {:?})",
            kind, scope.cluster, scope.namespace, scope.name
        );

        let (controllers, services, pods, pvcs, storage_classes) = tokio::try_join!(
            self.controllers(kind, scope),
            self.services(scope),
            self.pods(scope),
            self.pvcs(scope),
            self.storage_classes(scope),
        )?;

        Ok(FetchedResources {
            controllers,
            siblings: SiblingCollections {
                services,
                pods,
                pvcs,
                storage_classes,
            },
        })
    }

    async fn controllers(
        &self,
        kind: WorkloadKind,
        scope: &FetchScope,
    ) -> K8sResult<Vec<WorkloadController>> {
        slot(kind.resource(), fetch_controllers(self.access.as_ref(), kind, scope)).await
    }

    async fn services(&self, scope: &FetchScope) -> K8sResult<Vec<ServiceInfo>> {
        slot(
            "services",
            self.access.list_services(&scope.cluster, &scope.namespace),
        )
        .await
    }

    async fn pods(&self, scope: &FetchScope) -> K8sResult<Vec<PodInfo>> {
        slot("pods", self.access.list_pods(&scope.cluster, &scope.namespace)).await
    }

    async fn pvcs(&self, scope: &FetchScope) -> K8sResult<Vec<PvcInfo>> {
        slot(
            "persistentvolumeclaims",
            self.access.list_pvcs(&scope.cluster, &scope.namespace),
        )
        .await
    }

    async fn storage_classes(&self, scope: &FetchScope) -> K8sResult<Vec<StorageClassInfo>> {
        slot(
            "storageclasses",
            self.access.list_storage_classes(&scope.cluster),
        )
        .await
    }
}

/// List controllers of one kind, or Get a single one when the scope names it
/// within a namespace. A name without a namespace lists and filters.
async fn fetch_controllers(
    access: &dyn ClusterAccess,
    kind: WorkloadKind,
    scope: &FetchScope,
) -> K8sResult<Vec<WorkloadController>> {
    let (cluster, namespace) = (scope.cluster.as_str(), scope.namespace.as_str());

    if let (Some(name), false) = (scope.name.as_deref(), namespace.is_empty()) {
        let controller: WorkloadController = match kind {
            WorkloadKind::Deployment => access.get_deployment(cluster, namespace, name).await?.into(),
            WorkloadKind::StatefulSet => {
                access.get_statefulset(cluster, namespace, name).await?.into()
            }
            WorkloadKind::DaemonSet => access.get_daemonset(cluster, namespace, name).await?.into(),
        };
        return Ok(vec![controller]);
    }

    let mut controllers: Vec<WorkloadController> = match kind {
        WorkloadKind::Deployment => access
            .list_deployments(cluster, namespace)
            .await?
            .into_iter()
            .map(WorkloadController::from)
            .collect(),
        WorkloadKind::StatefulSet => access
            .list_statefulsets(cluster, namespace)
            .await?
            .into_iter()
            .map(WorkloadController::from)
            .collect(),
        WorkloadKind::DaemonSet => access
            .list_daemonsets(cluster, namespace)
            .await?
            .into_iter()
            .map(WorkloadController::from)
            .collect(),
    };

    if let Some(name) = scope.name.as_deref() {
        controllers.retain(|c| c.name() == name);
        if controllers.is_empty() {
            return Err(K8sError::ResourceNotFound {
                kind: kind.to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
        }
    }

    Ok(controllers)
}

/// Run one fan-out slot, tagging its failure with the resource it was fetching
async fn slot<T>(
    resource: &'static str,
    fetch: impl Future<Output = K8sResult<T>>,
) -> K8sResult<T> {
    fetch.await.map_err(|e| {
        debug!("Fetch of {} failed: {}", resource, e);
        K8sError::fetch_failed(resource, e)
    })
}
