//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with cluster context.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use super::error::{K8sError, K8sResult};

/// Wrapper around kube-rs Client with cluster context
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    cluster_id: String,
    cluster_name: String,
    api_server: String,
}

impl K8sClient {
    /// Create client from kubeconfig YAML with optional context
    pub async fn from_kubeconfig(
        kubeconfig_yaml: &str,
        context: Option<&str>,
        cluster_id: String,
        cluster_name: String,
    ) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        let api_server = extract_api_server(&kubeconfig, context)?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            cluster_id,
            cluster_name,
            api_server,
        })
    }

    /// Create client from in-cluster configuration (for running inside K8s)
    pub fn from_incluster(cluster_id: String, cluster_name: String) -> K8sResult<Self> {
        let config = Config::incluster().map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to get in-cluster config: {}", e))
        })?;

        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            cluster_id,
            cluster_name,
            api_server,
        })
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Server git version, e.g. `v1.32.1+k3s1`
    pub async fn server_version(&self) -> K8sResult<String> {
        let version = self.inner.apiserver_version().await?;
        Ok(version.git_version)
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("cluster_id", &self.cluster_id)
            .field("cluster_name", &self.cluster_name)
            .field("api_server", &self.api_server)
            .finish()
    }
}

/// API server URL of the selected (or current) context
fn extract_api_server(kubeconfig: &Kubeconfig, context_name: Option<&str>) -> K8sResult<String> {
    let context_name = context_name
        .map(String::from)
        .or_else(|| kubeconfig.current_context.clone())
        .ok_or_else(|| {
            K8sError::InvalidKubeconfig("No context specified and no current-context".into())
        })?;

    let context = kubeconfig
        .contexts
        .iter()
        .find(|c| c.name == context_name)
        .ok_or_else(|| {
            K8sError::InvalidKubeconfig(format!("Context '{}' not found", context_name))
        })?;

    let cluster_name = context
        .context
        .as_ref()
        .map(|c| c.cluster.as_str())
        .ok_or_else(|| K8sError::InvalidKubeconfig("Context has no cluster reference".into()))?;

    let cluster = kubeconfig
        .clusters
        .iter()
        .find(|c| c.name == cluster_name)
        .ok_or_else(|| {
            K8sError::InvalidKubeconfig(format!("Cluster '{}' not found", cluster_name))
        })?;

    cluster
        .cluster
        .as_ref()
        .and_then(|c| c.server.clone())
        .ok_or_else(|| K8sError::InvalidKubeconfig("Cluster has no server URL".into()))
}
