//! Connected cluster registry
//!
//! Holds one kube client per cluster id and serves `ClusterAccess` by routing
//! each call to the client for its cluster.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::access::ClusterAccess;
use super::client::K8sClient;
use super::config_storage::{pvcs, storageclasses};
use super::error::{K8sError, K8sResult};
use super::networking::services;
use super::types::{
    DaemonSetInfo, DeploymentInfo, PodInfo, PvcInfo, ServiceInfo, StatefulSetInfo,
    StorageClassInfo,
};
use super::workloads::{daemonsets, deployments, pods, statefulsets};
use crate::config::ClusterConfig;

/// Connected clusters indexed by cluster id
#[derive(Clone, Default)]
pub struct ClusterRegistry {
    clients: Arc<RwLock<HashMap<String, K8sClient>>>,
}

impl ClusterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to a cluster and verify the API server answers
    pub async fn connect_cluster(&self, config: &ClusterConfig) -> K8sResult<()> {
        let name = config.display_name().to_string();

        let client = match &config.kubeconfig {
            Some(path) => {
                let kubeconfig = tokio::fs::read_to_string(path).await.map_err(|e| {
                    K8sError::InvalidKubeconfig(format!("Failed to read {:?}: {}", path, e))
                })?;
                K8sClient::from_kubeconfig(
                    &kubeconfig,
                    config.context.as_deref(),
                    config.id.clone(),
                    name,
                )
                .await?
            }
            None if config.in_cluster => K8sClient::from_incluster(config.id.clone(), name)?,
            None => {
                return Err(K8sError::InvalidKubeconfig(format!(
                    "Cluster '{}' has neither a kubeconfig nor in-cluster access",
                    config.id
                )))
            }
        };

        let version = client
            .server_version()
            .await
            .map_err(|e| K8sError::ClusterNotConnected(format!("{}: {}", config.id, e)))?;

        info!(
            "Connected to cluster '{}' ({}) at {} running {}",
            client.cluster_name(),
            client.cluster_id(),
            client.api_server(),
            version
        );

        self.clients
            .write()
            .await
            .insert(config.id.clone(), client);

        Ok(())
    }

    /// Connect every configured cluster, stopping at the first failure
    pub async fn connect_all(&self, configs: &[ClusterConfig]) -> K8sResult<()> {
        for config in configs {
            self.connect_cluster(config).await?;
        }
        Ok(())
    }

    /// Drop the client for a cluster
    pub async fn disconnect_cluster(&self, cluster_id: &str) -> K8sResult<()> {
        self.clients
            .write()
            .await
            .remove(cluster_id)
            .ok_or_else(|| K8sError::ClusterNotFound(cluster_id.to_string()))?;

        info!("Disconnected from cluster {}", cluster_id);
        Ok(())
    }

    /// Client for a connected cluster
    pub async fn get_client(&self, cluster_id: &str) -> K8sResult<K8sClient> {
        self.clients
            .read()
            .await
            .get(cluster_id)
            .cloned()
            .ok_or_else(|| K8sError::ClusterNotConnected(cluster_id.to_string()))
    }

    pub async fn cluster_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.clients.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl ClusterAccess for ClusterRegistry {
    async fn list_deployments(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<DeploymentInfo>> {
        let client = self.get_client(cluster).await?;
        deployments::list_deployments(&client, namespace).await
    }

    async fn get_deployment(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<DeploymentInfo> {
        let client = self.get_client(cluster).await?;
        deployments::get_deployment(&client, namespace, name).await
    }

    async fn list_statefulsets(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<StatefulSetInfo>> {
        let client = self.get_client(cluster).await?;
        statefulsets::list_statefulsets(&client, namespace).await
    }

    async fn get_statefulset(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<StatefulSetInfo> {
        let client = self.get_client(cluster).await?;
        statefulsets::get_statefulset(&client, namespace, name).await
    }

    async fn list_daemonsets(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<DaemonSetInfo>> {
        let client = self.get_client(cluster).await?;
        daemonsets::list_daemonsets(&client, namespace).await
    }

    async fn get_daemonset(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<DaemonSetInfo> {
        let client = self.get_client(cluster).await?;
        daemonsets::get_daemonset(&client, namespace, name).await
    }

    async fn list_services(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<ServiceInfo>> {
        let client = self.get_client(cluster).await?;
        services::list_services(&client, namespace).await
    }

    async fn list_pods(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<PodInfo>> {
        let client = self.get_client(cluster).await?;
        pods::list_pods(&client, namespace).await
    }

    async fn list_pvcs(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<PvcInfo>> {
        let client = self.get_client(cluster).await?;
        pvcs::list_pvcs(&client, namespace).await
    }

    async fn list_storage_classes(&self, cluster: &str) -> K8sResult<Vec<StorageClassInfo>> {
        let client = self.get_client(cluster).await?;
        storageclasses::list_storage_classes(&client).await
    }
}
