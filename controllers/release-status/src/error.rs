//! Controller-specific error types.
//!
//! Errors are split by blast radius: `PatchFailed` stays with one object,
//! `ScopeResolution` ends the reconcile loop.

use kube::Error as KubeError;
use thiserror::Error;

/// Errors returned by the cluster API collaborator.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Request failed before reaching the Kubernetes client
    #[allow(dead_code)] // Constructed by in-memory implementations
    #[error("Cluster API unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur in the Release Status Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes client construction failed
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Listing namespaces, or HelmReleases within a namespace, failed
    #[error("Failed to list {}: {source}", scope_target(.namespace.as_deref()))]
    ScopeResolution {
        /// Namespace whose HelmReleases could not be listed; `None` when
        /// namespace discovery itself failed
        namespace: Option<String>,
        /// Underlying cluster error
        source: ClusterError,
    },

    /// Writing a HelmRelease status failed
    #[error("Failed to patch HelmRelease {namespace}/{name} status: {source}")]
    PatchFailed {
        /// Namespace of the HelmRelease
        namespace: String,
        /// Name of the HelmRelease
        name: String,
        /// Underlying cluster error
        source: ClusterError,
    },
}

fn scope_target(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("HelmReleases in namespace {ns}"),
        None => "namespaces".to_string(),
    }
}
