//! Cluster API collaborator.
//!
//! The reconcile loop only needs three calls from the cluster, so they sit
//! behind `ClusterApi` and can be replaced by an in-memory implementation in
//! tests. `KubeClusterApi` is the real thing.

use crate::error::ClusterError;
use crate::patch::StatusPatch;
use crds::HelmRelease;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client, ResourceExt};

/// Cluster operations used by the reconcile loop.
#[async_trait::async_trait]
pub trait ClusterApi: Send + Sync {
    /// Names of all namespaces in the cluster.
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError>;

    /// HelmReleases in `namespace`, in listing order.
    async fn list_releases(&self, namespace: &str) -> Result<Vec<HelmRelease>, ClusterError>;

    /// Merge-patches the status subresource of one HelmRelease.
    async fn patch_release_status(
        &self,
        namespace: &str,
        name: &str,
        patch: &StatusPatch,
    ) -> Result<(), ClusterError>;
}

/// `ClusterApi` backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    /// Creates a new cluster API handle.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ClusterApi for KubeClusterApi {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let namespaces = api.list(&ListParams::default()).await?;
        Ok(namespaces.items.iter().map(ResourceExt::name_any).collect())
    }

    async fn list_releases(&self, namespace: &str) -> Result<Vec<HelmRelease>, ClusterError> {
        let api: Api<HelmRelease> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn patch_release_status(
        &self,
        namespace: &str,
        name: &str,
        patch: &StatusPatch,
    ) -> Result<(), ClusterError> {
        let api: Api<HelmRelease> = Api::namespaced(self.client.clone(), namespace);
        // CRDs don't support strategic merge; a merge patch replaces the two leaves
        api.patch_status(name, &PatchParams::default(), &Patch::Merge(patch))
            .await?;
        Ok(())
    }
}
