//! Release status probing.

use release_client::{ReleaseBackend, ReleaseInfo};
use std::sync::Arc;
use tracing::debug;

/// Result of probing one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The backend reported the release
    Observed(ReleaseInfo),
    /// Nothing to report yet: the release does not exist or the lookup failed
    NoData,
}

/// Looks up the current status of a release.
///
/// A missing release and a failed lookup both come back as
/// `ProbeOutcome::NoData`; the object is simply revisited on the next tick.
#[derive(Clone)]
pub struct StatusProbe {
    backend: Arc<dyn ReleaseBackend>,
}

impl StatusProbe {
    /// Creates a probe over `backend`.
    pub fn new(backend: Arc<dyn ReleaseBackend>) -> Self {
        Self { backend }
    }

    /// Probes the release called `release_name`, preferring one installed
    /// in `namespace`.
    pub async fn probe(&self, namespace: &str, release_name: &str) -> ProbeOutcome {
        match self.backend.get_release(namespace, release_name).await {
            Ok(Some(release)) => ProbeOutcome::Observed(release),
            Ok(None) => {
                debug!("Release {} not found", release_name);
                ProbeOutcome::NoData
            }
            Err(e) => {
                debug!("Release {} lookup failed: {}", release_name, e);
                ProbeOutcome::NoData
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_client::{MockReleaseBackend, ReleaseStatusCode};

    #[tokio::test]
    async fn test_probe_observed() {
        let backend = MockReleaseBackend::new();
        backend.set_status("foo", ReleaseStatusCode::Deployed);
        let probe = StatusProbe::new(Arc::new(backend));

        match probe.probe("default", "foo").await {
            ProbeOutcome::Observed(release) => assert_eq!(release.status, ReleaseStatusCode::Deployed),
            ProbeOutcome::NoData => panic!("expected an observed release"),
        }
    }

    #[tokio::test]
    async fn test_probe_not_found_is_no_data() {
        let probe = StatusProbe::new(Arc::new(MockReleaseBackend::new()));
        assert_eq!(probe.probe("default", "foo").await, ProbeOutcome::NoData);
    }

    #[tokio::test]
    async fn test_probe_backend_error_is_no_data() {
        let backend = MockReleaseBackend::new();
        backend.set_status("foo", ReleaseStatusCode::Deployed);
        backend.fail_release("foo", "connection refused");
        let probe = StatusProbe::new(Arc::new(backend));

        assert_eq!(probe.probe("default", "foo").await, ProbeOutcome::NoData);
    }
}
