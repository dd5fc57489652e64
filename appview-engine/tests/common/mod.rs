//! In-memory cluster used by the integration tests
//!
//! `FakeCluster` serves fixed collections through `ClusterAccess` and can be
//! told to fail or hang any single collection.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use appview_engine::kubernetes::access::ClusterAccess;
use appview_engine::kubernetes::error::{K8sError, K8sResult};
use appview_engine::kubernetes::types::{
    DaemonSetInfo, DeploymentInfo, LabelSelector, PodInfo, PodPhase, PodTemplate, PvcInfo,
    ServiceInfo, StatefulSetInfo, StorageClassInfo, VolumeInfo,
};
use async_trait::async_trait;

pub const CLUSTER: &str = "test-cluster";

/// One fan-out slot of the fake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Deployments,
    StatefulSets,
    DaemonSets,
    Services,
    Pods,
    Pvcs,
    StorageClasses,
}

impl Slot {
    pub const ALL: [Slot; 7] = [
        Slot::Deployments,
        Slot::StatefulSets,
        Slot::DaemonSets,
        Slot::Services,
        Slot::Pods,
        Slot::Pvcs,
        Slot::StorageClasses,
    ];

    /// Resource name the fetcher tags this slot's failures with
    pub fn resource(&self) -> &'static str {
        match self {
            Slot::Deployments => "deployments",
            Slot::StatefulSets => "statefulsets",
            Slot::DaemonSets => "daemonsets",
            Slot::Services => "services",
            Slot::Pods => "pods",
            Slot::Pvcs => "persistentvolumeclaims",
            Slot::StorageClasses => "storageclasses",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Yield once, then fail with `ClusterNotConnected`
    Fail,
    /// Never complete
    Hang,
}

/// Everything the fake cluster contains
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub deployments: Vec<DeploymentInfo>,
    pub statefulsets: Vec<StatefulSetInfo>,
    pub daemonsets: Vec<DaemonSetInfo>,
    pub services: Vec<ServiceInfo>,
    pub pods: Vec<PodInfo>,
    pub pvcs: Vec<PvcInfo>,
    pub storage_classes: Vec<StorageClassInfo>,
}

pub struct FakeCluster {
    fixture: Fixture,
    faults: Mutex<HashMap<Slot, Fault>>,
    calls: Mutex<Vec<(Slot, bool)>>,
    cancelled: Arc<AtomicUsize>,
}

/// Counts hanging slots that were dropped before completing
struct CancelGuard(Arc<AtomicUsize>);

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl FakeCluster {
    pub fn new(fixture: Fixture) -> Arc<Self> {
        Arc::new(Self {
            fixture,
            faults: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            cancelled: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn inject(&self, slot: Slot, fault: Fault) {
        self.faults.lock().unwrap().insert(slot, fault);
    }

    pub fn clear_faults(&self) {
        self.faults.lock().unwrap().clear();
    }

    /// Hanging slots dropped so far
    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Every call as (slot, was a Get)
    pub fn calls(&self) -> Vec<(Slot, bool)> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, cluster: &str, slot: Slot, get: bool) -> K8sResult<()> {
        self.calls.lock().unwrap().push((slot, get));

        let fault = self.faults.lock().unwrap().get(&slot).copied();
        match fault {
            None => Ok(()),
            Some(Fault::Fail) => {
                tokio::task::yield_now().await;
                Err(K8sError::ClusterNotConnected(cluster.to_string()))
            }
            Some(Fault::Hang) => {
                let _guard = CancelGuard(self.cancelled.clone());
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

fn in_namespace(item_namespace: &str, namespace: &str) -> bool {
    namespace.is_empty() || item_namespace == namespace
}

fn not_found(kind: &str, namespace: &str, name: &str) -> K8sError {
    K8sError::ResourceNotFound {
        kind: kind.to_string(),
        name: name.to_string(),
        namespace: namespace.to_string(),
    }
}

#[async_trait]
impl ClusterAccess for FakeCluster {
    async fn list_deployments(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<DeploymentInfo>> {
        self.enter(cluster, Slot::Deployments, false).await?;
        Ok(self
            .fixture
            .deployments
            .iter()
            .filter(|d| in_namespace(&d.namespace, namespace))
            .cloned()
            .collect())
    }

    async fn get_deployment(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<DeploymentInfo> {
        self.enter(cluster, Slot::Deployments, true).await?;
        self.fixture
            .deployments
            .iter()
            .find(|d| d.namespace == namespace && d.name == name)
            .cloned()
            .ok_or_else(|| not_found("Deployment", namespace, name))
    }

    async fn list_statefulsets(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<StatefulSetInfo>> {
        self.enter(cluster, Slot::StatefulSets, false).await?;
        Ok(self
            .fixture
            .statefulsets
            .iter()
            .filter(|s| in_namespace(&s.namespace, namespace))
            .cloned()
            .collect())
    }

    async fn get_statefulset(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<StatefulSetInfo> {
        self.enter(cluster, Slot::StatefulSets, true).await?;
        self.fixture
            .statefulsets
            .iter()
            .find(|s| s.namespace == namespace && s.name == name)
            .cloned()
            .ok_or_else(|| not_found("StatefulSet", namespace, name))
    }

    async fn list_daemonsets(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<DaemonSetInfo>> {
        self.enter(cluster, Slot::DaemonSets, false).await?;
        Ok(self
            .fixture
            .daemonsets
            .iter()
            .filter(|d| in_namespace(&d.namespace, namespace))
            .cloned()
            .collect())
    }

    async fn get_daemonset(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<DaemonSetInfo> {
        self.enter(cluster, Slot::DaemonSets, true).await?;
        self.fixture
            .daemonsets
            .iter()
            .find(|d| d.namespace == namespace && d.name == name)
            .cloned()
            .ok_or_else(|| not_found("DaemonSet", namespace, name))
    }

    async fn list_services(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<ServiceInfo>> {
        self.enter(cluster, Slot::Services, false).await?;
        Ok(self
            .fixture
            .services
            .iter()
            .filter(|s| in_namespace(&s.namespace, namespace))
            .cloned()
            .collect())
    }

    async fn list_pods(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<PodInfo>> {
        self.enter(cluster, Slot::Pods, false).await?;
        Ok(self
            .fixture
            .pods
            .iter()
            .filter(|p| in_namespace(&p.namespace, namespace))
            .cloned()
            .collect())
    }

    async fn list_pvcs(&self, cluster: &str, namespace: &str) -> K8sResult<Vec<PvcInfo>> {
        self.enter(cluster, Slot::Pvcs, false).await?;
        Ok(self
            .fixture
            .pvcs
            .iter()
            .filter(|p| in_namespace(&p.namespace, namespace))
            .cloned()
            .collect())
    }

    async fn list_storage_classes(&self, cluster: &str) -> K8sResult<Vec<StorageClassInfo>> {
        self.enter(cluster, Slot::StorageClasses, false).await?;
        Ok(self.fixture.storage_classes.clone())
    }
}

// ============== Fixture builders ==============

pub fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn template(pod_labels: &[(&str, &str)], claims: &[&str]) -> PodTemplate {
    PodTemplate {
        labels: labels(pod_labels),
        containers: vec![appview_engine::kubernetes::types::ContainerTemplate {
            name: "app".to_string(),
            image: "nginx:1.27".to_string(),
            ..Default::default()
        }],
        volumes: claims
            .iter()
            .map(|c| VolumeInfo {
                name: c.to_string(),
                claim_name: Some(c.to_string()),
            })
            .collect(),
    }
}

pub fn deployment(
    name: &str,
    namespace: &str,
    selector: &[(&str, &str)],
    claims: &[&str],
) -> DeploymentInfo {
    DeploymentInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        labels: labels(selector),
        selector: Some(LabelSelector::from_labels(selector.iter().copied())),
        replicas: Some(1),
        strategy: "RollingUpdate".to_string(),
        template: template(selector, claims),
        ..Default::default()
    }
}

pub fn statefulset(
    name: &str,
    namespace: &str,
    selector: &[(&str, &str)],
    claims: &[&str],
) -> StatefulSetInfo {
    StatefulSetInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        labels: labels(selector),
        selector: Some(LabelSelector::from_labels(selector.iter().copied())),
        replicas: Some(3),
        template: template(selector, claims),
        ..Default::default()
    }
}

pub fn daemonset(name: &str, namespace: &str, selector: &[(&str, &str)]) -> DaemonSetInfo {
    DaemonSetInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        labels: labels(selector),
        selector: Some(LabelSelector::from_labels(selector.iter().copied())),
        desired_number_scheduled: 3,
        template: template(selector, &[]),
        ..Default::default()
    }
}

pub fn pod(name: &str, namespace: &str, pod_labels: &[(&str, &str)], phase: PodPhase) -> PodInfo {
    PodInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        phase,
        labels: labels(pod_labels),
        ..Default::default()
    }
}

pub fn service(name: &str, namespace: &str, selector: &[(&str, &str)]) -> ServiceInfo {
    ServiceInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        selector: labels(selector),
        ..Default::default()
    }
}

pub fn pvc(name: &str, namespace: &str, class: Option<&str>) -> PvcInfo {
    PvcInfo {
        name: name.to_string(),
        namespace: namespace.to_string(),
        status: "Bound".to_string(),
        storage_class: class.map(String::from),
        ..Default::default()
    }
}

pub fn storage_class(name: &str) -> StorageClassInfo {
    StorageClassInfo {
        name: name.to_string(),
        provisioner: "rancher.io/local-path".to_string(),
        ..Default::default()
    }
}

/// A `web` Deployment with one pod, one service and one claim, next to an
/// unrelated `db` pod, service and claim in the same namespace
pub fn web_fixture() -> Fixture {
    Fixture {
        deployments: vec![deployment("web", "default", &[("app", "web")], &["web-data"])],
        pods: vec![
            pod("web-aaa", "default", &[("app", "web")], PodPhase::Running),
            pod("db-0", "default", &[("app", "db")], PodPhase::Running),
        ],
        services: vec![
            service("web-svc", "default", &[("app", "web")]),
            service("db-svc", "default", &[("app", "db")]),
        ],
        pvcs: vec![
            pvc("web-data", "default", Some("standard")),
            pvc("db-data", "default", Some("standard")),
        ],
        storage_classes: vec![storage_class("standard")],
        ..Default::default()
    }
}
