//! StatefulSet operations

use k8s_openapi::api::apps::v1::StatefulSet;
use kube::api::{Api, ListParams};

use super::{get_named, scoped_api, selector_to_info, template_to_info};
use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::StatefulSetInfo;

/// List StatefulSets in a namespace (empty for all namespaces)
pub async fn list_statefulsets(
    client: &K8sClient,
    namespace: &str,
) -> K8sResult<Vec<StatefulSetInfo>> {
    let statefulsets: Api<StatefulSet> = scoped_api(client, namespace);
    let list = statefulsets.list(&ListParams::default()).await?;

    Ok(list.items.into_iter().map(statefulset_to_info).collect())
}

/// Get a specific StatefulSet
pub async fn get_statefulset(
    client: &K8sClient,
    namespace: &str,
    name: &str,
) -> K8sResult<StatefulSetInfo> {
    let sts: StatefulSet = get_named(client, "StatefulSet", namespace, name).await?;
    Ok(statefulset_to_info(sts))
}

/// Convert k8s StatefulSet to StatefulSetInfo
pub(crate) fn statefulset_to_info(sts: StatefulSet) -> StatefulSetInfo {
    let metadata = sts.metadata;
    let status = sts.status.unwrap_or_default();

    let mut info = StatefulSetInfo {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        ready_replicas: status.ready_replicas.unwrap_or(0),
        current_replicas: status.current_replicas.unwrap_or(0),
        updated_replicas: status.updated_replicas.unwrap_or(0),
        pod_management_policy: "OrderedReady".to_string(),
        update_strategy: "RollingUpdate".to_string(),
        created_at: metadata.creation_timestamp.map(|t| t.0.to_rfc3339()),
        ..Default::default()
    };

    if let Some(spec) = sts.spec {
        let service_name: Option<String> = spec.service_name.into();

        info.selector = Some(selector_to_info(spec.selector));
        info.replicas = spec.replicas;
        info.service_name = service_name.filter(|s| !s.is_empty());
        info.template = template_to_info(spec.template);
        if let Some(policy) = spec.pod_management_policy {
            info.pod_management_policy = policy;
        }
        if let Some(strategy) = spec.update_strategy.and_then(|s| s.type_) {
            info.update_strategy = strategy;
        }
    }

    info
}
