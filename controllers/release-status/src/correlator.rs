//! Correlation of HelmReleases with their Helm releases.
//!
//! For one HelmRelease this works out the release it maps to, probes that
//! release, and compares the observed status with the recorded one.

use crate::patch::StatusUpdate;
use crate::probe::{ProbeOutcome, StatusProbe};
use crds::{DEFAULT_NAMESPACE, HelmRelease};
use kube::ResourceExt;

/// What to do about one HelmRelease this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No release data; leave the object alone
    NoData,
    /// Recorded status already matches the release
    UpToDate,
    /// Recorded status is stale
    Update(StatusUpdate),
}

/// Decides whether a HelmRelease status needs rewriting.
#[derive(Clone)]
pub struct Correlator {
    probe: StatusProbe,
}

impl Correlator {
    /// Creates a correlator probing through `probe`.
    pub fn new(probe: StatusProbe) -> Self {
        Self { probe }
    }

    /// Correlates one HelmRelease with its release.
    pub async fn correlate(&self, release: &HelmRelease) -> Decision {
        let release_name = release.release_name();
        let namespace = release.namespace().unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let outcome = self.probe.probe(&namespace, &release_name).await;
        decide(release_name, release.recorded_release_status(), &outcome)
    }
}

/// Compares the probed status with the recorded one.
pub fn decide(release_name: String, recorded_status: &str, outcome: &ProbeOutcome) -> Decision {
    match outcome {
        ProbeOutcome::NoData => Decision::NoData,
        ProbeOutcome::Observed(info) => {
            let observed = info.status.as_str();
            if observed == recorded_status {
                Decision::UpToDate
            } else {
                Decision::Update(StatusUpdate {
                    release_name,
                    release_status: observed.to_string(),
                })
            }
        }
    }
}
