//! Kubernetes storage resources
//!
//! PersistentVolumeClaims and StorageClasses.

pub mod pvcs;
pub mod storageclasses;
