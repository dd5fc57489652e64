//! Deployment operations

use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Api, ListParams};

use super::{get_named, scoped_api, selector_to_info, template_to_info};
use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::DeploymentInfo;

/// List deployments in a namespace (empty for all namespaces)
pub async fn list_deployments(
    client: &K8sClient,
    namespace: &str,
) -> K8sResult<Vec<DeploymentInfo>> {
    let deployments: Api<Deployment> = scoped_api(client, namespace);
    let list = deployments.list(&ListParams::default()).await?;

    Ok(list.items.into_iter().map(deployment_to_info).collect())
}

/// Get a single deployment
pub async fn get_deployment(
    client: &K8sClient,
    namespace: &str,
    name: &str,
) -> K8sResult<DeploymentInfo> {
    let deployment: Deployment = get_named(client, "Deployment", namespace, name).await?;
    Ok(deployment_to_info(deployment))
}

/// Convert k8s Deployment to DeploymentInfo
pub(crate) fn deployment_to_info(deployment: Deployment) -> DeploymentInfo {
    let metadata = deployment.metadata;
    let status = deployment.status.unwrap_or_default();

    let (selector, replicas, strategy, template) = match deployment.spec {
        Some(spec) => (
            Some(selector_to_info(spec.selector)),
            spec.replicas,
            spec.strategy.and_then(|s| s.type_),
            template_to_info(spec.template),
        ),
        None => (None, None, None, Default::default()),
    };

    DeploymentInfo {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        selector,
        replicas,
        ready_replicas: status.ready_replicas.unwrap_or(0),
        available_replicas: status.available_replicas.unwrap_or(0),
        updated_replicas: status.updated_replicas.unwrap_or(0),
        strategy: strategy.unwrap_or_else(|| "RollingUpdate".to_string()),
        template,
        created_at: metadata.creation_timestamp.map(|t| t.0.to_rfc3339()),
    }
}
