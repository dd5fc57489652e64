//! Kubernetes networking resources

pub mod services;
