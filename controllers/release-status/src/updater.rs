//! The reconcile loop.
//!
//! On every tick the loop resolves the namespace scope, lists the
//! HelmReleases in each namespace and brings their status in line with the
//! Helm releases they map to.
//!
//! Failures are handled by blast radius:
//! - a status patch that fails is logged and the sweep moves on to the next object
//! - a listing that fails (namespaces, or HelmReleases in one namespace) stops
//!   the loop for good; restarting it is up to whoever runs the controller

use crate::cluster::ClusterApi;
use crate::correlator::{Correlator, Decision};
use crate::error::ControllerError;
use crate::patch::{StatusPatch, StatusUpdate};
use crate::probe::StatusProbe;
use crate::scope::NamespaceScope;
use crate::ticker::Ticker;
use crds::HelmRelease;
use kube::ResourceExt;
use release_client::ReleaseBackend;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next tick or the stop signal
    Idle,
    /// Running a sweep
    Scanning,
    /// Terminated, either on request or after a scope-level failure
    Stopped,
}

/// Counters for one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Namespaces scanned
    pub namespaces: usize,
    /// HelmReleases seen
    pub objects: usize,
    /// Status patches applied
    pub patched: usize,
    /// Objects whose status already matched
    pub up_to_date: usize,
    /// Objects with no release data this tick
    pub no_data: usize,
    /// Status patches that failed
    pub failed: usize,
    /// HelmReleases whose release name was already claimed by another
    pub collisions: usize,
}

/// Periodic HelmRelease status reconciler.
pub struct ReconcileLoop {
    cluster: Arc<dyn ClusterApi>,
    correlator: Correlator,
    scope: NamespaceScope,
    state: LoopState,
}

impl ReconcileLoop {
    /// Creates a loop over the given collaborators.
    pub fn new(
        cluster: Arc<dyn ClusterApi>,
        backend: Arc<dyn ReleaseBackend>,
        scope: NamespaceScope,
    ) -> Self {
        Self {
            cluster,
            correlator: Correlator::new(StatusProbe::new(backend)),
            scope,
            state: LoopState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs sweeps on every tick until stopped.
    ///
    /// The stop signal is only looked at between sweeps. It fires when `stop`
    /// holds `true` or its sender is dropped. Returns `Ok(())` when stopped on
    /// request, or the scope-level error that ended the loop.
    pub async fn run<T>(
        &mut self,
        ticker: &mut T,
        stop: &mut watch::Receiver<bool>,
    ) -> Result<(), ControllerError>
    where
        T: Ticker + ?Sized,
    {
        info!(
            "Reconcile loop started, scanning {}",
            self.scope.fixed().unwrap_or("all namespaces")
        );

        let result = loop {
            self.state = LoopState::Idle;

            tokio::select! {
                biased;
                () = stop_requested(stop) => break Ok(()),
                () = ticker.tick() => {}
            }

            self.state = LoopState::Scanning;
            match self.sweep().await {
                Ok(report) => log_report(&report),
                Err(e) => break Err(e),
            }
        };

        self.state = LoopState::Stopped;
        match &result {
            Ok(()) => info!("Reconcile loop stopping"),
            Err(e) => error!(error = %e, "Reconcile loop stopping"),
        }
        result
    }

    /// Runs one sweep over all namespaces in scope.
    ///
    /// Stops at the first scope-level failure; namespaces after the failing
    /// one are not visited.
    pub async fn sweep(&self) -> Result<SweepReport, ControllerError> {
        let namespaces = self.scope.resolve(self.cluster.as_ref()).await?;
        let mut report = SweepReport {
            namespaces: namespaces.len(),
            ..Default::default()
        };
        // release name -> first "namespace/name" claiming it
        let mut claimed: HashMap<String, String> = HashMap::new();

        for namespace in &namespaces {
            let releases = self.cluster.list_releases(namespace).await.map_err(|source| {
                ControllerError::ScopeResolution {
                    namespace: Some(namespace.clone()),
                    source,
                }
            })?;
            debug!("Found {} HelmReleases in namespace {}", releases.len(), namespace);

            for release in &releases {
                self.reconcile_object(namespace, release, &mut report, &mut claimed)
                    .await;
            }
        }

        Ok(report)
    }

    async fn reconcile_object(
        &self,
        namespace: &str,
        release: &HelmRelease,
        report: &mut SweepReport,
        claimed: &mut HashMap<String, String>,
    ) {
        let name = release.name_any();
        let identity = format!("{namespace}/{name}");
        report.objects += 1;

        match claimed.entry(release.release_name()) {
            Entry::Occupied(first) => {
                report.collisions += 1;
                warn!(
                    release = %first.key(),
                    first = %first.get(),
                    second = %identity,
                    "Multiple HelmReleases map to the same release"
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(identity);
            }
        }

        match self.correlator.correlate(release).await {
            Decision::NoData => report.no_data += 1,
            Decision::UpToDate => report.up_to_date += 1,
            Decision::Update(update) => match self.apply(namespace, &name, &update).await {
                Ok(()) => {
                    report.patched += 1;
                    info!(
                        "Updated HelmRelease {}/{} status: release {} is {}",
                        namespace, name, update.release_name, update.release_status
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        namespace = %namespace,
                        resource = %name,
                        release = %update.release_name,
                        error = %e,
                        "Failed to update HelmRelease status"
                    );
                }
            },
        }
    }

    async fn apply(
        &self,
        namespace: &str,
        name: &str,
        update: &StatusUpdate,
    ) -> Result<(), ControllerError> {
        let patch = StatusPatch::new(update);
        self.cluster
            .patch_release_status(namespace, name, &patch)
            .await
            .map_err(|source| ControllerError::PatchFailed {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })
    }
}

async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    // A closed channel counts as a stop request
    if stop.wait_for(|stopped| *stopped).await.is_err() {
        debug!("Stop signal sender dropped");
    }
}

fn log_report(report: &SweepReport) {
    if report.patched > 0 || report.failed > 0 {
        info!(
            namespaces = report.namespaces,
            objects = report.objects,
            patched = report.patched,
            failed = report.failed,
            "Sweep complete"
        );
    } else {
        debug!(
            namespaces = report.namespaces,
            objects = report.objects,
            up_to_date = report.up_to_date,
            no_data = report.no_data,
            collisions = report.collisions,
            "Sweep complete"
        );
    }
}
