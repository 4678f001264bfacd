//! Secret-backed release lookups
//!
//! Helm 3 stores every release revision as a Secret of type
//! `helm.sh/release.v1`, labelled with the release name, revision and status.
//! The labels carry everything needed to report status, so the encoded
//! release payload is never decoded.

use crate::backend_trait::ReleaseBackend;
use crate::error::ReleaseError;
use crate::models::{ReleaseInfo, ReleaseStatusCode};
use k8s_openapi::api::core::v1::Secret;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Secret type written by the Helm 3 storage driver.
pub const HELM_SECRET_TYPE: &str = "helm.sh/release.v1";

/// Label marking storage records owned by Helm.
pub const OWNER_LABEL: &str = "owner";
/// Label carrying the release name.
pub const NAME_LABEL: &str = "name";
/// Label carrying the revision number.
pub const VERSION_LABEL: &str = "version";
/// Label carrying the revision status.
pub const STATUS_LABEL: &str = "status";

/// Reads release status from Helm's Secret storage driver.
#[derive(Clone)]
pub struct SecretReleaseBackend {
    client: Client,
    storage_namespace: Option<String>,
}

impl std::fmt::Debug for SecretReleaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretReleaseBackend")
            .field("storage_namespace", &self.storage_namespace)
            .finish_non_exhaustive()
    }
}

impl SecretReleaseBackend {
    /// Creates a backend.
    ///
    /// With `storage_namespace` set, only that namespace is searched for
    /// release records; otherwise all namespaces are, and a release in the
    /// caller's namespace wins over same-named releases elsewhere.
    pub fn new(client: Client, storage_namespace: Option<String>) -> Self {
        Self {
            client,
            storage_namespace,
        }
    }

    fn secrets_api(&self) -> Api<Secret> {
        match self.storage_namespace.as_deref() {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}

#[async_trait::async_trait]
impl ReleaseBackend for SecretReleaseBackend {
    async fn get_release(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ReleaseInfo>, ReleaseError> {
        let selector = format!("{OWNER_LABEL}=helm,{NAME_LABEL}={name}");
        let lp = ListParams::default()
            .labels(&selector)
            .fields(&format!("type={HELM_SECRET_TYPE}"));

        let secrets = self.secrets_api().list(&lp).await?;
        debug!("Found {} storage records for release {}", secrets.items.len(), name);

        Ok(latest_release(namespace, name, &secrets.items))
    }
}

/// Picks the highest revision of `name` among Helm storage Secrets.
///
/// Release names are only unique within a namespace, so records are grouped
/// by namespace first. Records in `preferred_namespace` win; otherwise the
/// release must live in exactly one namespace, and a name held by several
/// namespaces yields `None`.
///
/// Records of another type, another release, or without a numeric
/// `version` label are skipped.
pub fn latest_release(
    preferred_namespace: &str,
    name: &str,
    secrets: &[Secret],
) -> Option<ReleaseInfo> {
    let mut by_namespace: BTreeMap<String, Vec<(ReleaseInfo, String)>> = BTreeMap::new();
    for secret in secrets {
        match parse_record(name, secret) {
            Ok(info) => by_namespace
                .entry(info.namespace.clone())
                .or_default()
                .push((info, secret.name_any())),
            Err(e) => debug!("Skipping storage record {}: {}", secret.name_any(), e),
        }
    }

    let records = match by_namespace.remove(preferred_namespace) {
        Some(records) => records,
        None if by_namespace.len() > 1 => {
            let namespaces: Vec<&str> = by_namespace.keys().map(String::as_str).collect();
            warn!(
                release = %name,
                namespaces = ?namespaces,
                "Release name is used in several namespaces, none of them {}",
                preferred_namespace
            );
            return None;
        }
        None => by_namespace.into_values().next()?,
    };

    // Secret name breaks ties between duplicate revisions
    records
        .into_iter()
        .max_by(|(a, a_secret), (b, b_secret)| {
            a.version.cmp(&b.version).then_with(|| a_secret.cmp(b_secret))
        })
        .map(|(info, _)| info)
}

fn parse_record(name: &str, secret: &Secret) -> Result<ReleaseInfo, ReleaseError> {
    if secret.type_.as_deref() != Some(HELM_SECRET_TYPE) {
        return Err(ReleaseError::InvalidRecord(format!(
            "unexpected secret type {:?}",
            secret.type_
        )));
    }

    let labels = secret.labels();
    if labels.get(NAME_LABEL).map(String::as_str) != Some(name) {
        return Err(ReleaseError::InvalidRecord(format!(
            "record does not belong to release {name}"
        )));
    }

    let version = labels
        .get(VERSION_LABEL)
        .ok_or_else(|| ReleaseError::InvalidRecord("missing version label".to_string()))?
        .parse::<u32>()
        .map_err(|e| ReleaseError::InvalidRecord(format!("invalid version label: {e}")))?;

    let status = labels
        .get(STATUS_LABEL)
        .map_or(ReleaseStatusCode::Unknown, |s| ReleaseStatusCode::from_label(s));

    Ok(ReleaseInfo {
        name: name.to_string(),
        namespace: secret.namespace().unwrap_or_default(),
        version,
        status,
    })
}
