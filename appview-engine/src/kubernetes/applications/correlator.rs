//! Controller correlation
//!
//! Joins one workload controller to the pods its selector picks, the services
//! fronting those pods, and the PVC -> StorageClass chain referenced by its
//! pod template.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::controller::WorkloadController;
use super::fetcher::SiblingCollections;
use super::selector::Selector;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::{PodInfo, PvcInfo, ServiceInfo, StorageClassInfo};

/// A claim mounted by the controller and the StorageClass it resolved to
#[derive(Debug, Clone, Copy)]
pub struct CorrelatedVolume<'a> {
    pub claim: &'a PvcInfo,
    /// `None` when the claim names no class or the class does not exist
    pub storage_class: Option<&'a StorageClassInfo>,
}

/// Everything that belongs to one controller
#[derive(Debug, Clone)]
pub struct Correlation<'a> {
    pub controller: &'a WorkloadController,
    pub pods: Vec<&'a PodInfo>,
    pub services: Vec<&'a ServiceInfo>,
    pub volumes: Vec<CorrelatedVolume<'a>>,
}

/// Indexes sibling collections once so many controllers can be correlated
/// against the same fetch
pub struct Correlator<'a> {
    pods: &'a [PodInfo],
    services: Vec<(&'a ServiceInfo, Selector)>,
    pvcs: HashMap<(&'a str, &'a str), &'a PvcInfo>,
    storage_classes: HashMap<&'a str, &'a StorageClassInfo>,
}

impl<'a> Correlator<'a> {
    pub fn new(siblings: &'a SiblingCollections) -> Self {
        let services = siblings
            .services
            .iter()
            .map(|svc| (svc, Selector::from_labels(Some(&svc.selector))))
            .collect();

        // Later entries overwrite earlier ones: last duplicate in fetch order wins
        let pvcs = siblings
            .pvcs
            .iter()
            .map(|pvc| ((pvc.namespace.as_str(), pvc.name.as_str()), pvc))
            .collect();

        let storage_classes = siblings
            .storage_classes
            .iter()
            .map(|sc| (sc.name.as_str(), sc))
            .collect();

        Self {
            pods: &siblings.pods,
            services,
            pvcs,
            storage_classes,
        }
    }

    /// Correlate one controller. Fails only when its selector is unusable.
    pub fn correlate(&self, controller: &'a WorkloadController) -> K8sResult<Correlation<'a>> {
        let selector = controller.compile_selector()?;
        let namespace = controller.namespace();

        let pods: Vec<&PodInfo> = self
            .pods
            .iter()
            .filter(|pod| pod.namespace == namespace && selector.matches(&pod.labels))
            .collect();

        // Only this controller's pods count, so overlapping labels on a
        // neighbouring controller cannot pull its services in here
        let services: Vec<&ServiceInfo> = self
            .services
            .iter()
            .filter(|(svc, _)| svc.namespace == namespace)
            .filter(|(_, q)| pods.iter().any(|pod| q.matches(&pod.labels)))
            .map(|(svc, _)| *svc)
            .collect();

        let volumes = self.volumes(controller);

        debug!(
            "Correlated {} {}/{} [{}]: {} pods, {} services, {} claims",
            controller.kind(),
            namespace,
            controller.name(),
            selector,
            pods.len(),
            services.len(),
            volumes.len()
        );

        Ok(Correlation {
            controller,
            pods,
            services,
            volumes,
        })
    }

    fn volumes(&self, controller: &'a WorkloadController) -> Vec<CorrelatedVolume<'a>> {
        let namespace = controller.namespace();
        let mut seen = HashSet::new();
        let mut volumes = Vec::new();

        for claim_name in controller
            .pod_template_volumes()
            .iter()
            .filter_map(|v| v.claim_name.as_deref())
        {
            if !seen.insert(claim_name) {
                continue;
            }

            let Some(claim) = self.pvcs.get(&(namespace, claim_name)).copied() else {
                debug!(
                    "PVC {}/{} referenced by {} {} does not exist",
                    namespace,
                    claim_name,
                    controller.kind(),
                    controller.name()
                );
                continue;
            };

            let storage_class = claim.storage_class.as_deref().and_then(|class| {
                let resolved = self.storage_classes.get(class).copied();
                if resolved.is_none() {
                    warn!(
                        "StorageClass '{}' for PVC {}/{} not found",
                        class, namespace, claim.name
                    );
                }
                resolved
            });

            volumes.push(CorrelatedVolume {
                claim,
                storage_class,
            });
        }

        volumes
    }
}
