//! Helm Release Client
//!
//! Looks up the current status of Helm releases by name and namespace.
//!
//! # Example
//!
//! ```no_run
//! use release_client::{ReleaseBackend, SecretReleaseBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube::Client::try_default().await?;
//! let backend = SecretReleaseBackend::new(client, None);
//!
//! if let Some(release) = backend.get_release("default", "default-web").await? {
//!     println!("{} is {}", release.name, release.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Secret storage**: Reads the records written by the Helm 3 Secret storage driver
//! - **Latest revision**: Resolves the highest revision of a release
//! - **Mocking**: `MockReleaseBackend` behind the `test-util` feature

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod backend_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::SecretReleaseBackend;
pub use error::ReleaseError;
pub use models::*;
pub use backend_trait::ReleaseBackend;
#[cfg(feature = "test-util")]
pub use mock::MockReleaseBackend;
