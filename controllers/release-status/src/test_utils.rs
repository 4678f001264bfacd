//! Test utilities for unit testing the reconcile loop
//!
//! Provides an in-memory `ClusterApi` with fault injection and patch
//! recording, a scripted ticker, and HelmRelease builders.

use crate::cluster::ClusterApi;
use crate::error::ClusterError;
use crate::patch::StatusPatch;
use crate::ticker::Ticker;
use crds::{HelmRelease, HelmReleaseSpec, HelmReleaseStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Helper to create a test HelmRelease
pub fn create_test_helm_release(
    namespace: &str,
    name: &str,
    release_name: Option<&str>,
    recorded_status: Option<&str>,
) -> HelmRelease {
    HelmRelease {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: HelmReleaseSpec {
            release_name: release_name.map(str::to_string),
            ..Default::default()
        },
        status: recorded_status.map(|status| HelmReleaseStatus {
            release_name: release_name.map(str::to_string),
            release_status: Some(status.to_string()),
        }),
    }
}

/// A status patch as received by `MockClusterApi`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPatch {
    pub namespace: String,
    pub name: String,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct ClusterState {
    namespaces: Vec<String>,
    releases: HashMap<String, Vec<HelmRelease>>,
    namespace_failure: Option<String>,
    list_failures: HashMap<String, String>,
    patch_failures: HashSet<(String, String)>,
    patches: Vec<RecordedPatch>,
    namespace_listings: usize,
    release_listings: Vec<String>,
}

/// In-memory `ClusterApi`
///
/// Successful patches are recorded and merged into the stored objects, so a
/// second sweep sees the status written by the first.
#[derive(Clone, Default)]
pub struct MockClusterApi {
    state: Arc<Mutex<ClusterState>>,
}

impl MockClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ClusterState> {
        self.state.lock().unwrap()
    }

    pub fn add_namespace(&self, namespace: &str) {
        let mut state = self.state();
        if !state.namespaces.iter().any(|ns| ns == namespace) {
            state.namespaces.push(namespace.to_string());
        }
    }

    /// Adds a HelmRelease (and its namespace) to the store
    pub fn add_release(&self, release: HelmRelease) {
        let namespace = release.namespace().unwrap_or_default();
        self.add_namespace(&namespace);
        self.state().releases.entry(namespace).or_default().push(release);
    }

    pub fn fail_namespace_listing(&self, message: &str) {
        self.state().namespace_failure = Some(message.to_string());
    }

    pub fn fail_release_listing(&self, namespace: &str, message: &str) {
        self.add_namespace(namespace);
        self.state()
            .list_failures
            .insert(namespace.to_string(), message.to_string());
    }

    pub fn fail_patch(&self, namespace: &str, name: &str) {
        self.state()
            .patch_failures
            .insert((namespace.to_string(), name.to_string()));
    }

    pub fn patches(&self) -> Vec<RecordedPatch> {
        self.state().patches.clone()
    }

    pub fn namespace_listings(&self) -> usize {
        self.state().namespace_listings
    }

    /// Namespaces whose HelmReleases were listed, in order
    pub fn release_listings(&self) -> Vec<String> {
        self.state().release_listings.clone()
    }

    /// Current stored copy of a HelmRelease
    pub fn get_release(&self, namespace: &str, name: &str) -> Option<HelmRelease> {
        self.state()
            .releases
            .get(namespace)?
            .iter()
            .find(|r| r.name_any() == name)
            .cloned()
    }
}

#[async_trait::async_trait]
impl ClusterApi for MockClusterApi {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        let mut state = self.state();
        state.namespace_listings += 1;
        if let Some(message) = &state.namespace_failure {
            return Err(ClusterError::Unavailable(message.clone()));
        }
        Ok(state.namespaces.clone())
    }

    async fn list_releases(&self, namespace: &str) -> Result<Vec<HelmRelease>, ClusterError> {
        let mut state = self.state();
        state.release_listings.push(namespace.to_string());
        if let Some(message) = state.list_failures.get(namespace) {
            return Err(ClusterError::Unavailable(message.clone()));
        }
        Ok(state.releases.get(namespace).cloned().unwrap_or_default())
    }

    async fn patch_release_status(
        &self,
        namespace: &str,
        name: &str,
        patch: &StatusPatch,
    ) -> Result<(), ClusterError> {
        let mut state = self.state();
        if state
            .patch_failures
            .contains(&(namespace.to_string(), name.to_string()))
        {
            return Err(ClusterError::Unavailable(format!("patch of {namespace}/{name} rejected")));
        }

        state.patches.push(RecordedPatch {
            namespace: namespace.to_string(),
            name: name.to_string(),
            body: serde_json::to_value(patch).unwrap(),
        });

        if let Some(release) = state
            .releases
            .get_mut(namespace)
            .and_then(|releases| releases.iter_mut().find(|r| r.name_any() == name))
        {
            let status = release.status.get_or_insert_with(HelmReleaseStatus::default);
            if let Some(release_name) = &patch.status.release_name {
                status.release_name = Some(release_name.clone());
            }
            if let Some(release_status) = &patch.status.release_status {
                status.release_status = Some(release_status.clone());
            }
        }
        Ok(())
    }
}

/// Ticker that fires a fixed number of times, then raises the stop signal
pub struct ScriptedTicker {
    remaining: usize,
    stop: watch::Sender<bool>,
}

impl ScriptedTicker {
    /// Returns the ticker and the stop receiver to hand to the loop
    pub fn new(ticks: usize) -> (Self, watch::Receiver<bool>) {
        let (stop, rx) = watch::channel(false);
        (Self { remaining: ticks, stop }, rx)
    }

    /// Raises the stop signal now
    pub fn request_stop(&self) {
        self.stop.send_replace(true);
    }
}

#[async_trait::async_trait]
impl Ticker for ScriptedTicker {
    async fn tick(&mut self) {
        if self.remaining == 0 {
            self.stop.send_replace(true);
            std::future::pending::<()>().await;
        }
        self.remaining -= 1;
    }
}
