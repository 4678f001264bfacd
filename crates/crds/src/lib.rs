//! Release Status CRD Definitions
//!
//! Kubernetes Custom Resource Definitions consumed by the release status
//! controller.

pub mod helm_release;

pub use helm_release::*;
