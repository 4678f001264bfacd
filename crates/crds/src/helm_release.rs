//! HelmRelease CRD
//!
//! Declares the desired Helm release for a chart. The controller only
//! reports on the release; it never installs or upgrades it.

use kube::{CustomResource, ResourceExt};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

/// Namespace assumed for objects that carry none in their metadata.
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[kube(
    group = "helm.microscaler.io",
    version = "v1alpha1",
    kind = "HelmRelease",
    namespaced,
    status = "HelmReleaseStatus",
    shortname = "hr",
    printcolumn = r#"{"name":"Release","type":"string","jsonPath":".status.releaseName"}"#,
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.releaseStatus"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseSpec {
    /// Explicit Helm release name (defaults to `<namespace>-<name>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,

    /// Chart to release
    #[serde(default)]
    pub chart: ChartSource,

    /// Values passed to the chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_fields")]
    pub values: Option<serde_json::Value>,
}

/// Where the chart comes from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSource {
    /// Chart name
    pub name: String,

    /// Chart repository URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Chart version constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Observed state of the Helm release backing a `HelmRelease`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HelmReleaseStatus {
    /// Name of the Helm release last observed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,

    /// Status code of the Helm release last observed (e.g. `DEPLOYED`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_status: Option<String>,
}

impl HelmRelease {
    /// Name of the Helm release this object maps to.
    ///
    /// `spec.releaseName` wins when set and non-empty; otherwise the name is
    /// `<namespace>-<name>`, with objects lacking a namespace treated as
    /// living in `default`.
    pub fn release_name(&self) -> String {
        match self.spec.release_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let namespace = self.namespace().unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
                format!("{}-{}", namespace, self.name_any())
            }
        }
    }

    /// The recorded release status, with an absent status reading as empty.
    pub fn recorded_release_status(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.release_status.as_deref())
            .unwrap_or("")
    }
}

fn preserve_unknown_fields(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "object",
        "x-kubernetes-preserve-unknown-fields": true
    })
}
