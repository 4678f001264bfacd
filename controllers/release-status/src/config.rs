//! Controller configuration.
//!
//! Read from environment variables at startup:
//! - `WATCH_NAMESPACE`: only scan this namespace (unset or empty: all namespaces)
//! - `RECONCILE_INTERVAL_SECS`: seconds between sweeps (default 10)
//! - `HELM_STORAGE_NAMESPACE`: only look for Helm release records here (unset: all namespaces)

use crate::error::ControllerError;
use std::env;
use std::time::Duration;
use tracing::info;

/// Interval between sweeps when none is configured.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fixed namespace to scan, `None` for all namespaces
    pub namespace: Option<String>,
    /// Interval between sweeps
    pub tick_interval: Duration,
    /// Namespace holding Helm release records, `None` for all namespaces
    pub storage_namespace: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            storage_namespace: None,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tick_interval = match non_empty("RECONCILE_INTERVAL_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ControllerError::InvalidConfig(format!(
                        "RECONCILE_INTERVAL_SECS must be a positive integer, got {raw:?}"
                    ))
                })?;
                if secs == 0 {
                    return Err(ControllerError::InvalidConfig(
                        "RECONCILE_INTERVAL_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TICK_INTERVAL,
        };

        Ok(Self {
            namespace: non_empty("WATCH_NAMESPACE"),
            tick_interval,
            storage_namespace: non_empty("HELM_STORAGE_NAMESPACE"),
        })
    }

    /// Logs the effective configuration.
    pub fn log(&self) {
        info!("Configuration:");
        info!("  Namespace: {}", self.namespace.as_deref().unwrap_or("all namespaces"));
        info!("  Reconcile interval: {}s", self.tick_interval.as_secs());
        info!(
            "  Helm storage namespace: {}",
            self.storage_namespace.as_deref().unwrap_or("all namespaces")
        );
    }
}
