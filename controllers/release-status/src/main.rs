//! Release Status Controller
//!
//! Keeps the status of `HelmRelease` resources in step with the Helm
//! releases they declare.
//!
//! Every tick the controller lists HelmReleases (in one namespace or in all
//! of them), looks up the release each one maps to, and patches
//! `status.releaseName` / `status.releaseStatus` when the recorded status is
//! stale. It never installs, upgrades or removes releases.

mod cluster;
mod config;
mod correlator;
mod error;
mod patch;
mod probe;
mod scope;
mod ticker;
mod updater;
#[cfg(test)]
mod test_utils;

use crate::cluster::KubeClusterApi;
use crate::config::Config;
use crate::error::ControllerError;
use crate::scope::NamespaceScope;
use crate::ticker::IntervalTicker;
use crate::updater::ReconcileLoop;
use kube::Client;
use release_client::SecretReleaseBackend;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // kube's rustls-tls needs a process-wide crypto provider
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("rustls crypto provider already installed");
    }

    info!("Starting Release Status Controller");

    let config = Config::from_env()?;
    config.log();

    let client = Client::try_default().await?;
    let cluster = Arc::new(KubeClusterApi::new(client.clone()));
    let backend = Arc::new(SecretReleaseBackend::new(client, config.storage_namespace.clone()));

    let mut reconcile_loop = ReconcileLoop::new(
        cluster,
        backend,
        NamespaceScope::new(config.namespace.clone()),
    );

    let (stop_tx, mut stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        stop_tx.send_replace(true);
    });

    let mut ticker = IntervalTicker::new(config.tick_interval);
    let result = reconcile_loop.run(&mut ticker, &mut stop_rx).await;
    debug!("Reconcile loop finished in state {:?}", reconcile_loop.state());
    result
}

/// Completes on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
