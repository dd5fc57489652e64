//! StorageClass operations (cluster-scoped)

use k8s_openapi::api::storage::v1::StorageClass;
use kube::api::{Api, ListParams};

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::StorageClassInfo;

const DEFAULT_CLASS_ANNOTATION: &str = "storageclass.kubernetes.io/is-default-class";

/// List all StorageClasses
pub async fn list_storage_classes(client: &K8sClient) -> K8sResult<Vec<StorageClassInfo>> {
    let storage_classes: Api<StorageClass> = Api::all(client.inner().clone());
    let list = storage_classes.list(&ListParams::default()).await?;

    Ok(list.items.into_iter().map(storage_class_to_info).collect())
}

/// Convert k8s StorageClass to StorageClassInfo
pub(crate) fn storage_class_to_info(sc: StorageClass) -> StorageClassInfo {
    let metadata = sc.metadata;

    let is_default = metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(DEFAULT_CLASS_ANNOTATION))
        .is_some_and(|v| v == "true");

    StorageClassInfo {
        name: metadata.name.unwrap_or_default(),
        provisioner: sc.provisioner,
        reclaim_policy: sc.reclaim_policy,
        volume_binding_mode: sc.volume_binding_mode,
        allow_volume_expansion: sc.allow_volume_expansion.unwrap_or(false),
        parameters: sc.parameters.unwrap_or_default(),
        is_default,
        created_at: metadata.creation_timestamp.map(|t| t.0.to_rfc3339()),
    }
}
