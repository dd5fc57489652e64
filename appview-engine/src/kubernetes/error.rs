//! Kubernetes error types
//!
//! Errors raised while fetching cluster resources and assembling application
//! views. Nothing here is retried; every variant propagates to the caller.

use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// A controller's selector is missing or cannot be evaluated
    #[error("Invalid selector on {kind} {namespace}/{name}: {reason}")]
    SelectorInvalid {
        kind: String,
        name: String,
        namespace: String,
        reason: String,
    },

    /// One of the concurrent collection fetches failed
    #[error("Failed to fetch {resource}: {source}")]
    FetchFailed {
        resource: &'static str,
        #[source]
        source: Box<K8sError>,
    },

    /// No Deployment, StatefulSet or DaemonSet carries the requested name
    #[error("Application not found: {name} in namespace {namespace}")]
    NotFound { name: String, namespace: String },

    /// Kubernetes resource not found
    #[error("Resource not found: {kind}/{name} in namespace {namespace}")]
    ResourceNotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    /// Cluster is not connected
    #[error("Cluster not connected: {0}")]
    ClusterNotConnected(String),

    /// Cluster not found in registry
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    /// Error from kube-rs client
    #[cfg(feature = "kubernetes")]
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// Invalid kubeconfig
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),
}

impl K8sError {
    /// Wrap an error raised by one slot of a fan-out
    pub fn fetch_failed(resource: &'static str, source: K8sError) -> Self {
        K8sError::FetchFailed {
            resource,
            source: Box::new(source),
        }
    }

    /// True for `NotFound`/`ResourceNotFound`, looking through fetch wrappers
    pub fn is_not_found(&self) -> bool {
        match self {
            K8sError::NotFound { .. } | K8sError::ResourceNotFound { .. } => true,
            K8sError::FetchFailed { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// True when the fetch of `resource` itself came back empty-handed.
    ///
    /// A not-found from any other slot of the same fan-out does not count.
    pub fn is_not_found_for(&self, resource: &str) -> bool {
        match self {
            K8sError::FetchFailed {
                resource: failed,
                source,
            } => *failed == resource && source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(kind: &str) -> K8sError {
        K8sError::ResourceNotFound {
            kind: kind.to_string(),
            name: "web".to_string(),
            namespace: "default".to_string(),
        }
    }

    #[test]
    fn test_not_found_through_wrapper() {
        let err = K8sError::fetch_failed("deployments", missing("Deployment"));
        assert!(err.is_not_found());
        assert!(err.is_not_found_for("deployments"));
        assert!(!err.is_not_found_for("pods"));
    }

    #[test]
    fn test_other_failures_are_not_not_found() {
        let err = K8sError::fetch_failed(
            "deployments",
            K8sError::ClusterNotConnected("prod".to_string()),
        );
        assert!(!err.is_not_found());
        assert!(!err.is_not_found_for("deployments"));
        assert_eq!(
            err.to_string(),
            "Failed to fetch deployments: Cluster not connected: prod"
        );
    }
}
