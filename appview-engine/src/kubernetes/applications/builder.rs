//! Application aggregate building
//!
//! Turns a correlation into the `Application` shape. Replica counts,
//! health and the template/live container views are normalized here so that
//! every controller kind produces the same output.

use chrono::{DateTime, Utc};

use super::correlator::Correlation;
use crate::kubernetes::types::{
    Application, ApplicationPod, ApplicationVolume, PodInfo, ServiceInfo,
};

/// Replica value reported for DaemonSets, which have no replica count
pub const DAEMONSET_REPLICAS: i32 = 1;

/// Builds applications relative to a fixed point in time
#[derive(Debug, Clone, Copy)]
pub struct ApplicationBuilder {
    now: DateTime<Utc>,
}

impl ApplicationBuilder {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn build(&self, correlation: &Correlation<'_>) -> Application {
        let controller = correlation.controller;

        let healthy_count = correlation
            .pods
            .iter()
            .filter(|pod| pod.phase.is_healthy())
            .count() as i32;

        Application {
            app_type: controller.kind().into(),
            name: controller.name().to_string(),
            namespace: controller.namespace().to_string(),
            labels: controller.labels().clone(),
            replicas: controller.desired_replicas().unwrap_or(DAEMONSET_REPLICAS),
            healthy_count,
            containers: controller.pod_template_containers().to_vec(),
            pods: correlation
                .pods
                .iter()
                .map(|pod| self.pod_view(pod))
                .collect(),
            services: correlation
                .services
                .iter()
                .map(|svc| ServiceInfo::clone(svc))
                .collect(),
            persistent_volume_claims: correlation
                .volumes
                .iter()
                .map(|v| ApplicationVolume {
                    claim: v.claim.clone(),
                    storage_class: v.storage_class.cloned(),
                })
                .collect(),
        }
    }

    fn pod_view(&self, pod: &PodInfo) -> ApplicationPod {
        ApplicationPod {
            name: pod.name.clone(),
            namespace: pod.namespace.clone(),
            phase: pod.phase,
            ready: ready_string(pod),
            restarts: self.restarts_string(pod),
            node_name: pod.node_name.clone(),
            pod_ip: pod.pod_ip.clone(),
            age: pod.created_at.map(|t| human_duration(self.now - t)),
            last_condition: pod.last_condition.clone(),
            labels: pod.labels.clone(),
        }
    }

    /// `"3"`, or `"3 (5m ago)"` when some container has terminated before
    fn restarts_string(&self, pod: &PodInfo) -> String {
        let restarts: i32 = pod.containers.iter().map(|c| c.restart_count).sum();

        let last_terminated = pod
            .containers
            .iter()
            .filter_map(|c| c.last_terminated_at)
            .max();

        match last_terminated {
            Some(at) => format!("{} ({} ago)", restarts, human_duration(self.now - at)),
            None => restarts.to_string(),
        }
    }
}

/// Ready containers over total, e.g. `"1/2"`
fn ready_string(pod: &PodInfo) -> String {
    let ready = pod.containers.iter().filter(|c| c.ready).count();
    format!("{}/{}", ready, pod.containers.len())
}

/// Compact age the way kubectl prints it: `45s`, `5m30s`, `2h`, `3d4h`, `2y10d`
pub fn human_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds();
    if seconds < -1 {
        return "<invalid>".to_string();
    }
    if seconds < 0 {
        return "0s".to_string();
    }
    if seconds < 60 * 2 {
        return format!("{}s", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 10 {
        let s = seconds % 60;
        return if s == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, s)
        };
    }
    if minutes < 60 * 3 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 8 {
        let m = minutes % 60;
        return if m == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h{}m", hours, m)
        };
    }
    if hours < 48 {
        return format!("{}h", hours);
    }
    if hours < 24 * 8 {
        let h = hours % 24;
        return if h == 0 {
            format!("{}d", hours / 24)
        } else {
            format!("{}d{}h", hours / 24, h)
        };
    }
    if hours < 24 * 365 * 2 {
        return format!("{}d", hours / 24);
    }
    if hours < 24 * 365 * 8 {
        let d = (hours / 24) % 365;
        return if d == 0 {
            format!("{}y", hours / 24 / 365)
        } else {
            format!("{}y{}d", hours / 24 / 365, d)
        };
    }
    format!("{}y", hours / 24 / 365)
}
