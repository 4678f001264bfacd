//! Namespace scope resolution.

use crate::cluster::ClusterApi;
use crate::error::ControllerError;

/// The namespaces a sweep covers: one fixed namespace, or every namespace
/// in the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceScope {
    namespace: Option<String>,
}

impl NamespaceScope {
    /// Creates a scope; `None` or an empty string means all namespaces.
    pub fn new(namespace: Option<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    /// The fixed namespace, if any.
    pub fn fixed(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Resolves the namespaces to scan this tick.
    ///
    /// A fixed namespace is returned as-is without checking that it exists.
    /// Otherwise the cluster is asked, and a failure there is a
    /// `ControllerError::ScopeResolution` with no namespace attached.
    pub async fn resolve(&self, cluster: &dyn ClusterApi) -> Result<Vec<String>, ControllerError> {
        if let Some(ns) = &self.namespace {
            return Ok(vec![ns.clone()]);
        }

        cluster
            .list_namespaces()
            .await
            .map_err(|source| ControllerError::ScopeResolution {
                namespace: None,
                source,
            })
    }
}
