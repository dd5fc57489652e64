//! Single application resolution
//!
//! A name alone does not say which controller kind owns it. Kinds are probed
//! in `WorkloadKind::PRECEDENCE` order and the first one that has the name
//! wins, so a Deployment shadows a StatefulSet or DaemonSet of the same name.

use tracing::debug;

use super::controller::WorkloadController;
use super::fetcher::{CollectionFetcher, FetchScope, SiblingCollections};
use crate::kubernetes::error::{K8sError, K8sResult};
use crate::kubernetes::types::WorkloadKind;

/// The controller a name resolved to, with the siblings fetched alongside it
#[derive(Debug, Clone)]
pub struct Resolved {
    pub controller: WorkloadController,
    pub siblings: SiblingCollections,
}

/// Find the controller called `name`, probing one kind per fan-out.
///
/// A not-found on the controller slot moves on to the next kind. Any other
/// failure, including a not-found from a sibling slot, aborts the search.
pub async fn resolve(
    fetcher: &CollectionFetcher,
    cluster: &str,
    namespace: &str,
    name: &str,
) -> K8sResult<Resolved> {
    let scope = FetchScope::named(cluster, namespace, name);

    for kind in WorkloadKind::PRECEDENCE {
        let fetched = match fetcher.fetch_kind(kind, &scope).await {
            Ok(fetched) => fetched,
            Err(e) if e.is_not_found_for(kind.resource()) => {
                debug!("No {} named {} in namespace '{}'", kind, name, namespace);
                continue;
            }
            Err(e) => return Err(e),
        };

        // Listing across namespaces can match several; the first one is used
        if let Some(controller) = fetched.controllers.into_iter().next() {
            debug!(
                "Resolved {} to {} {}/{}",
                name,
                kind,
                controller.namespace(),
                controller.name()
            );
            return Ok(Resolved {
                controller,
                siblings: fetched.siblings,
            });
        }
    }

    Err(K8sError::NotFound {
        name: name.to_string(),
        namespace: namespace.to_string(),
    })
}
