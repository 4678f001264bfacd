//! Release client errors

use thiserror::Error;

/// Errors that can occur when looking up Helm releases
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Kubernetes API error while reading release storage
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// A storage record exists but cannot be interpreted
    #[error("Invalid release record: {0}")]
    InvalidRecord(String),

    /// The backend failed for any other reason
    #[error("Release backend error: {0}")]
    Backend(String),
}
