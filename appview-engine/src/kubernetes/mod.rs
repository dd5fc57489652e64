//! Kubernetes application views for the engine
//!
//! - `access`: the read-only seam every lookup goes through
//! - `applications`: selector evaluation, fan-out fetching, correlation and
//!   building of `Application` aggregates
//! - `client`, `registry` and the per-resource modules: the kube-rs backed
//!   implementation of `access` (feature `kubernetes`)

pub mod access;
pub mod applications;
pub mod error;
pub mod types;

#[cfg(feature = "kubernetes")]
pub mod client;
#[cfg(feature = "kubernetes")]
pub mod config_storage;
#[cfg(feature = "kubernetes")]
pub mod networking;
#[cfg(feature = "kubernetes")]
pub mod registry;
#[cfg(feature = "kubernetes")]
pub mod workloads;

pub use access::ClusterAccess;
pub use applications::ApplicationManager;
pub use error::{K8sError, K8sResult};
#[cfg(feature = "kubernetes")]
pub use registry::ClusterRegistry;
