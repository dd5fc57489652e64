//! Pod operations

use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};

use super::scoped_api;
use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::{ContainerInfo, PodCondition, PodInfo, PodPhase};

/// List pods in a namespace (empty for all namespaces)
pub async fn list_pods(client: &K8sClient, namespace: &str) -> K8sResult<Vec<PodInfo>> {
    let pods: Api<Pod> = scoped_api(client, namespace);
    let pod_list = pods.list(&ListParams::default()).await?;

    Ok(pod_list.items.into_iter().map(pod_to_info).collect())
}

/// Convert k8s Pod to PodInfo
pub(crate) fn pod_to_info(pod: Pod) -> PodInfo {
    let metadata = pod.metadata;
    let spec = pod.spec.unwrap_or_default();
    let status = pod.status.unwrap_or_default();

    let container_statuses = status.container_statuses.unwrap_or_default();
    let containers: Vec<ContainerInfo> = spec
        .containers
        .iter()
        .map(|c| {
            let cs = container_statuses.iter().find(|cs| cs.name == c.name);

            let last_terminated_at = cs
                .and_then(|cs| cs.last_state.as_ref())
                .and_then(|s| s.terminated.as_ref())
                .and_then(|t| t.finished_at.as_ref())
                .map(|t| t.0);

            ContainerInfo {
                name: c.name.clone(),
                image: c.image.clone().unwrap_or_default(),
                ready: cs.map(|cs| cs.ready).unwrap_or(false),
                restart_count: cs.map(|cs| cs.restart_count).unwrap_or(0),
                last_terminated_at,
            }
        })
        .collect();

    // Latest transition wins
    let last_condition = status
        .conditions
        .unwrap_or_default()
        .into_iter()
        .max_by_key(|c| c.last_transition_time.as_ref().map(|t| t.0))
        .map(|c| PodCondition {
            condition_type: c.type_,
            status: c.status,
            reason: c.reason,
            message: c.message,
            last_transition_time: c.last_transition_time.map(|t| t.0.to_rfc3339()),
        });

    PodInfo {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        phase: PodPhase::from_phase(status.phase.as_deref()),
        node_name: spec.node_name,
        pod_ip: status.pod_ip,
        containers,
        labels: metadata.labels.unwrap_or_default(),
        last_condition,
        created_at: metadata.creation_timestamp.map(|t| t.0),
    }
}
