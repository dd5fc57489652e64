//! PersistentVolumeClaim operations

use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use kube::api::{Api, ListParams};

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::PvcInfo;
use crate::kubernetes::workloads::scoped_api;

/// List PVCs in a namespace (empty for all namespaces)
pub async fn list_pvcs(client: &K8sClient, namespace: &str) -> K8sResult<Vec<PvcInfo>> {
    let pvcs: Api<PersistentVolumeClaim> = scoped_api(client, namespace);
    let list = pvcs.list(&ListParams::default()).await?;

    Ok(list.items.into_iter().map(pvc_to_info).collect())
}

/// Convert k8s PVC to PvcInfo
pub(crate) fn pvc_to_info(pvc: PersistentVolumeClaim) -> PvcInfo {
    let metadata = pvc.metadata;
    let spec = pvc.spec.unwrap_or_default();
    let status = pvc.status.unwrap_or_default();

    let capacity = status
        .capacity
        .and_then(|c| c.get("storage").map(|q| q.0.clone()));

    let requested_capacity = spec
        .resources
        .and_then(|r| r.requests)
        .and_then(|r| r.get("storage").map(|q| q.0.clone()));

    PvcInfo {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        status: status.phase.unwrap_or_else(|| "Unknown".to_string()),
        volume_name: spec.volume_name,
        storage_class: spec.storage_class_name,
        access_modes: status.access_modes.or(spec.access_modes).unwrap_or_default(),
        capacity,
        requested_capacity,
        labels: metadata.labels.unwrap_or_default(),
        created_at: metadata.creation_timestamp.map(|t| t.0.to_rfc3339()),
    }
}
