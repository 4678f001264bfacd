//! HelmRelease status patches.
//!
//! A patch only ever names `status.releaseName` and `status.releaseStatus`,
//! so applying it as a merge patch cannot clobber any other field of the
//! object and needs no prior read.

use serde::Serialize;

/// New release status to record on one HelmRelease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Release the status was observed on
    pub release_name: String,
    /// Canonical status code string
    pub release_status: String,
}

/// Merge patch document for the status subresource.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct StatusPatch {
    /// Status leaves to set
    pub status: StatusFields,
}

/// The two status leaves a patch may set; unset leaves are omitted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatusFields {
    /// `status.releaseName`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    /// `status.releaseStatus`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_status: Option<String>,
}

impl StatusPatch {
    /// Builds the patch setting both leaves from `update`.
    pub fn new(update: &StatusUpdate) -> Self {
        Self {
            status: StatusFields {
                release_name: Some(update.release_name.clone()),
                release_status: Some(update.release_status.clone()),
            },
        }
    }
}
