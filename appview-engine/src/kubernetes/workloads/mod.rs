//! Kubernetes workload resources
//!
//! List/get for Deployments, StatefulSets, DaemonSets and Pods, converted
//! into the engine's snapshot types.

pub mod daemonsets;
pub mod deployments;
pub mod pods;
pub mod statefulsets;

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as meta;
use k8s_openapi::NamespaceResourceScope;
use kube::api::Api;
use kube::Resource;

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::{K8sError, K8sResult};
use crate::kubernetes::types::{
    ContainerPort, ContainerTemplate, LabelSelector, LabelSelectorRequirement, PodTemplate,
    VolumeInfo,
};

/// Namespaced API handle; an empty namespace addresses every namespace
pub(crate) fn scoped_api<K>(client: &K8sClient, namespace: &str) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    <K as Resource>::DynamicType: Default,
{
    if namespace.is_empty() {
        Api::all(client.inner().clone())
    } else {
        Api::namespaced(client.inner().clone(), namespace)
    }
}

/// Get one object, turning a missing one into `ResourceNotFound`
pub(crate) async fn get_named<K>(
    client: &K8sClient,
    kind: &str,
    namespace: &str,
    name: &str,
) -> K8sResult<K>
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + std::fmt::Debug
        + serde::de::DeserializeOwned,
    <K as Resource>::DynamicType: Default,
{
    let api: Api<K> = Api::namespaced(client.inner().clone(), namespace);
    api.get_opt(name)
        .await?
        .ok_or_else(|| K8sError::ResourceNotFound {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
        })
}

/// Controller selector; absent terms become empty collections
pub(crate) fn selector_to_info(selector: meta::LabelSelector) -> LabelSelector {
    LabelSelector {
        match_labels: selector.match_labels.unwrap_or_default(),
        match_expressions: selector
            .match_expressions
            .unwrap_or_default()
            .into_iter()
            .map(|e| LabelSelectorRequirement {
                key: e.key,
                operator: e.operator,
                values: e.values.unwrap_or_default(),
            })
            .collect(),
    }
}

/// Pod template: labels, declared containers and PVC-backed volumes
pub(crate) fn template_to_info(template: PodTemplateSpec) -> PodTemplate {
    let labels = template
        .metadata
        .and_then(|m| m.labels)
        .unwrap_or_default();
    let spec = template.spec.unwrap_or_default();

    let volumes = spec
        .volumes
        .unwrap_or_default()
        .into_iter()
        .map(|v| VolumeInfo {
            name: v.name,
            claim_name: v.persistent_volume_claim.map(|pvc| pvc.claim_name),
        })
        .collect();

    PodTemplate {
        labels,
        containers: spec.containers.into_iter().map(container_to_template).collect(),
        volumes,
    }
}

fn container_to_template(container: Container) -> ContainerTemplate {
    let resources = container.resources.unwrap_or_default();

    let ports = container
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|p| ContainerPort {
            name: p.name,
            container_port: p.container_port,
            protocol: p.protocol.unwrap_or_else(|| "TCP".to_string()),
        })
        .collect();

    ContainerTemplate {
        name: container.name,
        image: container.image.unwrap_or_default(),
        ports,
        requests: quantities(resources.requests),
        limits: quantities(resources.limits),
    }
}

fn quantities(map: Option<BTreeMap<String, Quantity>>) -> BTreeMap<String, String> {
    map.unwrap_or_default()
        .into_iter()
        .map(|(k, q)| (k, q.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_conversion() {
        let template: PodTemplateSpec = serde_yaml::from_str(
            r#"
metadata:
  labels:
    app: web
spec:
  containers:
    - name: app
      image: nginx:1.27
      ports:
        - containerPort: 8080
          name: http
      resources:
        requests:
          cpu: 100m
          memory: 128Mi
        limits:
          memory: 256Mi
  volumes:
    - name: data
      persistentVolumeClaim:
        claimName: web-data
    - name: config
      configMap:
        name: web-config
"#,
        )
        .unwrap();

        let info = template_to_info(template);

        assert_eq!(info.labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(info.containers.len(), 1);
        let container = &info.containers[0];
        assert_eq!(container.image, "nginx:1.27");
        assert_eq!(container.ports[0].container_port, 8080);
        assert_eq!(container.ports[0].protocol, "TCP");
        assert_eq!(container.requests.get("cpu").map(String::as_str), Some("100m"));
        assert_eq!(container.limits.get("memory").map(String::as_str), Some("256Mi"));

        assert_eq!(info.volumes.len(), 2);
        assert_eq!(info.volumes[0].claim_name.as_deref(), Some("web-data"));
        assert_eq!(info.volumes[1].claim_name, None);
    }

    #[test]
    fn test_selector_conversion() {
        let selector: meta::LabelSelector = serde_yaml::from_str(
            r#"
matchLabels:
  app: web
matchExpressions:
  - key: tier
    operator: In
    values: [frontend]
  - key: legacy
    operator: DoesNotExist
"#,
        )
        .unwrap();

        let info = selector_to_info(selector);

        assert_eq!(info.match_labels.len(), 1);
        assert_eq!(info.match_expressions.len(), 2);
        assert_eq!(info.match_expressions[1].operator, "DoesNotExist");
        assert!(info.match_expressions[1].values.is_empty());
    }
}
