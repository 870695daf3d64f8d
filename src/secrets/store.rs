//! SecretStore trait for secret backend implementations.

use anyhow::Result;

/// Health of the secret backend as seen from this process
#[derive(Debug, Clone, PartialEq)]
pub enum StoreHealth {
    /// Backend answered the health probe
    Healthy,
    /// Backend was reachable but the probe failed
    Unhealthy(String),
}

/// Trait for secret backend implementations.
///
/// A backend is a flat key-value store with separate config and secret
/// namespaces. Lookups return `Ok(None)` when the key is absent; transport
/// failures are errors so callers can decide how to degrade.
pub trait SecretStore: Send + Sync {
    /// Fetch a non-secret configuration value
    fn get_config(&self, key: &str) -> Result<Option<String>>;

    /// Fetch a secret value
    fn get_secret(&self, key: &str) -> Result<Option<String>>;

    /// Store a secret value, replacing any previous one
    fn set_secret(&self, key: &str, value: &str) -> Result<()>;

    /// Probe the backend
    fn health_check(&self) -> StoreHealth;
}
