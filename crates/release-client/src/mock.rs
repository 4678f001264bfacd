//! Mock ReleaseBackend for unit testing
//!
//! Stores releases in memory and can be told to fail lookups for specific
//! release names, so controllers can be tested without a cluster. Releases
//! are keyed by name only; the namespace passed to lookups is recorded but
//! not matched.

use crate::backend_trait::ReleaseBackend;
use crate::error::ReleaseError;
use crate::models::{ReleaseInfo, ReleaseStatusCode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock ReleaseBackend for testing
#[derive(Clone, Default, Debug)]
pub struct MockReleaseBackend {
    releases: Arc<Mutex<HashMap<String, ReleaseInfo>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    lookups: Arc<Mutex<Vec<String>>>,
    lookup_namespaces: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockReleaseBackend {
    /// Create an empty mock backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a release (for test setup)
    pub fn add_release(&self, release: ReleaseInfo) {
        lock(&self.releases).insert(release.name.clone(), release);
    }

    /// Shorthand for a revision 1 release in `default` with the given status
    pub fn set_status(&self, name: &str, status: ReleaseStatusCode) {
        self.add_release(ReleaseInfo::new(name, "default", 1, status));
    }

    /// Remove a release
    pub fn remove_release(&self, name: &str) {
        lock(&self.releases).remove(name);
    }

    /// Make lookups of `name` fail with a backend error
    pub fn fail_release(&self, name: &str, message: &str) {
        lock(&self.failures).insert(name.to_string(), message.to_string());
    }

    /// Release names looked up so far, in order
    pub fn lookups(&self) -> Vec<String> {
        lock(&self.lookups).clone()
    }

    /// Namespaces passed alongside each lookup, in order
    pub fn lookup_namespaces(&self) -> Vec<String> {
        lock(&self.lookup_namespaces).clone()
    }
}

#[async_trait::async_trait]
impl ReleaseBackend for MockReleaseBackend {
    async fn get_release(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<ReleaseInfo>, ReleaseError> {
        lock(&self.lookups).push(name.to_string());
        lock(&self.lookup_namespaces).push(namespace.to_string());

        if let Some(message) = lock(&self.failures).get(name) {
            return Err(ReleaseError::Backend(message.clone()));
        }

        Ok(lock(&self.releases).get(name).cloned())
    }
}
