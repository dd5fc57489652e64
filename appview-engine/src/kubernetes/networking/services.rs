//! Service operations

use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::{Api, ListParams};

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::{ServiceInfo, ServicePort, ServiceType};
use crate::kubernetes::workloads::scoped_api;

/// List Services in a namespace (empty for all namespaces)
pub async fn list_services(client: &K8sClient, namespace: &str) -> K8sResult<Vec<ServiceInfo>> {
    let services: Api<Service> = scoped_api(client, namespace);
    let list = services.list(&ListParams::default()).await?;

    Ok(list.items.into_iter().map(service_to_info).collect())
}

/// Convert k8s Service to ServiceInfo
pub(crate) fn service_to_info(service: Service) -> ServiceInfo {
    let metadata = service.metadata;
    let spec = service.spec.unwrap_or_default();

    let service_type = match spec.type_.as_deref() {
        Some("NodePort") => ServiceType::NodePort,
        Some("LoadBalancer") => ServiceType::LoadBalancer,
        Some("ExternalName") => ServiceType::ExternalName,
        _ => ServiceType::ClusterIP,
    };

    // Load balancer ingress first, then a manually assigned external IP
    let external_ip = service
        .status
        .and_then(|s| s.load_balancer)
        .and_then(|lb| lb.ingress)
        .and_then(|ingress| ingress.into_iter().next())
        .and_then(|ing| ing.ip.or(ing.hostname))
        .or_else(|| {
            spec.external_ips
                .as_ref()
                .and_then(|ips| ips.first().cloned())
        });

    let ports: Vec<ServicePort> = spec
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|p| ServicePort {
            name: p.name,
            protocol: p.protocol.unwrap_or_else(|| "TCP".to_string()),
            port: p.port,
            target_port: p
                .target_port
                .map(|tp| match tp {
                    IntOrString::Int(i) => i.to_string(),
                    IntOrString::String(s) => s,
                })
                .unwrap_or_default(),
            node_port: p.node_port,
        })
        .collect();

    ServiceInfo {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_default(),
        service_type,
        cluster_ip: spec.cluster_ip,
        external_ip,
        ports,
        selector: spec.selector.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        created_at: metadata.creation_timestamp.map(|t| t.0.to_rfc3339()),
    }
}
