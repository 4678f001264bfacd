//! ReleaseBackend trait for mocking
//!
//! This trait abstracts the release lookup so the controller can be tested
//! without a cluster. `SecretReleaseBackend` implements it for real clusters.

use crate::error::ReleaseError;
use crate::models::ReleaseInfo;

/// Trait for Helm release status lookups
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ReleaseBackend: Send + Sync {
    /// Get the latest revision of the named release.
    ///
    /// `namespace` is where the caller expects the release; a release with
    /// the same name in that namespace is preferred over others.
    ///
    /// Returns `Ok(None)` when no release with that name can be attributed.
    async fn get_release(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ReleaseInfo>, ReleaseError>;
}
