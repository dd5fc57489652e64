//! Application views
//!
//! Reconstructs `Application` aggregates from independently listed cluster
//! resources:
//! - `selector` compiles label selectors into predicates
//! - `fetcher` retrieves the sibling collections in one concurrent fan-out
//! - `correlator` joins a controller to its pods, services and claims
//! - `builder` shapes the result into an `Application`
//! - `resolver` finds a single application by name

pub mod builder;
pub mod controller;
pub mod correlator;
pub mod fetcher;
pub mod resolver;
pub mod selector;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::kubernetes::access::ClusterAccess;
use crate::kubernetes::error::K8sResult;
use crate::kubernetes::types::Application;
use builder::ApplicationBuilder;
use correlator::Correlator;
use fetcher::{CollectionFetcher, FetchScope};

pub use controller::WorkloadController;
pub use selector::Selector;

/// Entry point for application views over any `ClusterAccess`
#[derive(Clone)]
pub struct ApplicationManager {
    fetcher: CollectionFetcher,
}

impl ApplicationManager {
    pub fn new(access: Arc<dyn ClusterAccess>) -> Self {
        Self {
            fetcher: CollectionFetcher::new(access),
        }
    }

    /// Every application in a namespace (empty for all namespaces)
    pub async fn list_applications(
        &self,
        cluster: &str,
        namespace: &str,
    ) -> K8sResult<Vec<Application>> {
        self.list_applications_at(cluster, namespace, Utc::now())
            .await
    }

    /// `list_applications` with ages and restart times computed against `now`
    pub async fn list_applications_at(
        &self,
        cluster: &str,
        namespace: &str,
        now: DateTime<Utc>,
    ) -> K8sResult<Vec<Application>> {
        let fetched = self
            .fetcher
            .fetch_all(&FetchScope::list(cluster, namespace))
            .await?;

        let correlator = Correlator::new(&fetched.siblings);
        let builder = ApplicationBuilder::new(now);

        let applications = fetched
            .controllers
            .iter()
            .map(|controller| {
                correlator
                    .correlate(controller)
                    .map(|c| builder.build(&c))
            })
            .collect::<K8sResult<Vec<_>>>()?;

        info!(
            "Listed {} applications in cluster {} namespace '{}'",
            applications.len(),
            cluster,
            namespace
        );

        Ok(applications)
    }

    /// The application named `name`, resolved Deployment first, then
    /// StatefulSet, then DaemonSet
    pub async fn get_application(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> K8sResult<Application> {
        self.get_application_at(cluster, namespace, name, Utc::now())
            .await
    }

    /// `get_application` with ages and restart times computed against `now`
    pub async fn get_application_at(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> K8sResult<Application> {
        let resolved = resolver::resolve(&self.fetcher, cluster, namespace, name).await?;

        let correlator = Correlator::new(&resolved.siblings);
        let correlation = correlator.correlate(&resolved.controller)?;
        let application = ApplicationBuilder::new(now).build(&correlation);

        debug!(
            "Built {} {}/{} with {} pods",
            application.app_type,
            application.namespace,
            application.name,
            application.pods.len()
        );

        Ok(application)
    }
}
