//! DaemonSet operations

use k8s_openapi::api::apps::v1::DaemonSet;
use kube::api::{Api, ListParams};

use super::{get_named, scoped_api, selector_to_info, template_to_info};
use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::DaemonSetInfo;

/// List DaemonSets in a namespace (empty for all namespaces)
pub async fn list_daemonsets(
    client: &K8sClient,
    namespace: &str,
) -> K8sResult<Vec<DaemonSetInfo>> {
    let daemonsets: Api<DaemonSet> = scoped_api(client, namespace);
    let list = daemonsets.list(&ListParams::default()).await?;

    Ok(list.items.into_iter().map(daemonset_to_info).collect())
}

/// Get a specific DaemonSet
pub async fn get_daemonset(
    client: &K8sClient,
    namespace: &str,
    name: &str,
) -> K8sResult<DaemonSetInfo> {
    let ds: DaemonSet = get_named(client, "DaemonSet", namespace, name).await?;
    Ok(daemonset_to_info(ds))
}

/// Convert k8s DaemonSet to DaemonSetInfo
pub(crate) fn daemonset_to_info(ds: DaemonSet) -> DaemonSetInfo {
    let metadata = ds.metadata;
    let status = ds.status.unwrap_or_default();

    let (selector, update_strategy, template) = match ds.spec {
        Some(spec) => (
            Some(selector_to_info(spec.selector)),
            spec.update_strategy.and_then(|s| s.type_),
            template_to_info(spec.template),
        ),
        None => (None, None, Default::default()),
    };

    DaemonSetInfo {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        selector,
        desired_number_scheduled: status.desired_number_scheduled,
        current_number_scheduled: status.current_number_scheduled,
        number_ready: status.number_ready,
        number_available: status.number_available.unwrap_or(0),
        number_misscheduled: status.number_misscheduled,
        update_strategy: update_strategy.unwrap_or_else(|| "RollingUpdate".to_string()),
        template,
        created_at: metadata.creation_timestamp.map(|t| t.0.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemonset_to_info() {
        let ds: DaemonSet = serde_yaml::from_str(
            r#"
apiVersion: apps/v1
kind: DaemonSet
metadata:
  name: node-agent
  namespace: kube-system
spec:
  selector:
    matchLabels:
      app: node-agent
  updateStrategy:
    type: OnDelete
  template:
    metadata:
      labels:
        app: node-agent
    spec:
      containers:
        - name: agent
          image: agent:2.0
status:
  currentNumberScheduled: 3
  desiredNumberScheduled: 3
  numberMisscheduled: 0
  numberReady: 2
"#,
        )
        .unwrap();

        let info = daemonset_to_info(ds);

        assert_eq!(info.desired_number_scheduled, 3);
        assert_eq!(info.number_ready, 2);
        assert_eq!(info.number_available, 0);
        assert_eq!(info.update_strategy, "OnDelete");
        assert!(info.selector.is_some());
    }
}
