//! Helm release models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code of a Helm release revision.
///
/// The canonical string form is the upper snake-case name (`DEPLOYED`,
/// `PENDING_INSTALL`, ...), which is what gets recorded on intent objects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatusCode {
    #[default]
    Unknown,
    Deployed,
    Deleted,
    Superseded,
    Failed,
    Deleting,
    PendingInstall,
    PendingUpgrade,
    PendingRollback,
}

impl ReleaseStatusCode {
    /// Canonical string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Deployed => "DEPLOYED",
            Self::Deleted => "DELETED",
            Self::Superseded => "SUPERSEDED",
            Self::Failed => "FAILED",
            Self::Deleting => "DELETING",
            Self::PendingInstall => "PENDING_INSTALL",
            Self::PendingUpgrade => "PENDING_UPGRADE",
            Self::PendingRollback => "PENDING_ROLLBACK",
        }
    }

    /// Parses a storage `status` label or a canonical name.
    ///
    /// Matching ignores case and treats `-` like `_`. The Helm 3 names
    /// `uninstalled` and `uninstalling` map onto `DELETED` and `DELETING`.
    /// Anything unrecognised is `UNKNOWN`.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "DEPLOYED" => Self::Deployed,
            "DELETED" | "UNINSTALLED" => Self::Deleted,
            "SUPERSEDED" => Self::Superseded,
            "FAILED" => Self::Failed,
            "DELETING" | "UNINSTALLING" => Self::Deleting,
            "PENDING_INSTALL" => Self::PendingInstall,
            "PENDING_UPGRADE" => Self::PendingUpgrade,
            "PENDING_ROLLBACK" => Self::PendingRollback,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ReleaseStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest observed revision of a Helm release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Release name
    pub name: String,
    /// Namespace holding the release storage record
    pub namespace: String,
    /// Revision number
    pub version: u32,
    /// Status of this revision
    pub status: ReleaseStatusCode,
}

impl ReleaseInfo {
    /// Creates a release record.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        version: u32,
        status: ReleaseStatusCode,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            version,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_helm3_labels() {
        assert_eq!(ReleaseStatusCode::from_label("deployed"), ReleaseStatusCode::Deployed);
        assert_eq!(ReleaseStatusCode::from_label("superseded"), ReleaseStatusCode::Superseded);
        assert_eq!(ReleaseStatusCode::from_label("failed"), ReleaseStatusCode::Failed);
        assert_eq!(ReleaseStatusCode::from_label("uninstalled"), ReleaseStatusCode::Deleted);
        assert_eq!(ReleaseStatusCode::from_label("uninstalling"), ReleaseStatusCode::Deleting);
        assert_eq!(ReleaseStatusCode::from_label("pending-install"), ReleaseStatusCode::PendingInstall);
        assert_eq!(ReleaseStatusCode::from_label("pending-upgrade"), ReleaseStatusCode::PendingUpgrade);
        assert_eq!(ReleaseStatusCode::from_label("pending-rollback"), ReleaseStatusCode::PendingRollback);
    }

    #[test]
    fn test_from_label_canonical_names() {
        assert_eq!(ReleaseStatusCode::from_label("DEPLOYED"), ReleaseStatusCode::Deployed);
        assert_eq!(ReleaseStatusCode::from_label("PENDING_UPGRADE"), ReleaseStatusCode::PendingUpgrade);
        assert_eq!(ReleaseStatusCode::from_label("DELETED"), ReleaseStatusCode::Deleted);
    }

    #[test]
    fn test_from_label_unrecognised() {
        assert_eq!(ReleaseStatusCode::from_label(""), ReleaseStatusCode::Unknown);
        assert_eq!(ReleaseStatusCode::from_label("exploded"), ReleaseStatusCode::Unknown);
    }

    #[test]
    fn test_display_matches_serde() {
        for code in [
            ReleaseStatusCode::Unknown,
            ReleaseStatusCode::Deployed,
            ReleaseStatusCode::PendingRollback,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::String(code.to_string()));
        }
    }
}
