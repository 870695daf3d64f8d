use super::cache::TtlCache;
use crate::registry::{ServiceEntry, ServiceRegistry};
use crate::secrets::SecretStore;
use crate::traits::{Clock, Environment, Output};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default cache entry time-to-live
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Resolved configuration for one named external service.
///
/// `config` and `secrets` only ever contain keys declared in the service's
/// registry entry; a key absent from every source is omitted, never present
/// as an empty value.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub config: HashMap<String, String>,
    pub secrets: HashMap<String, String>,
    pub metadata: ServiceEntry,
}

enum Namespace {
    Config,
    Secret,
}

/// Resolves per-service configuration with a TTL cache in front.
///
/// Lookup is two-tier: the secret backend under `{service}_{key}`, then the
/// process environment under `{SERVICE}_{KEY}`. Backend failures are logged
/// and degrade to the environment tier; they never abort a resolution.
pub struct ConfigResolver {
    registry: ServiceRegistry,
    store: Option<Arc<dyn SecretStore>>,
    env: Arc<dyn Environment>,
    clock: Arc<dyn Clock>,
    output: Arc<dyn Output>,
    cache: TtlCache,
}

impl ConfigResolver {
    /// Create a resolver with the default cache TTL
    pub fn new(
        registry: ServiceRegistry,
        store: Option<Arc<dyn SecretStore>>,
        env: Arc<dyn Environment>,
        clock: Arc<dyn Clock>,
        output: Arc<dyn Output>,
    ) -> Self {
        Self::with_ttl(registry, store, env, clock, output, DEFAULT_CACHE_TTL)
    }

    /// Create a resolver with a custom cache TTL
    pub fn with_ttl(
        registry: ServiceRegistry,
        store: Option<Arc<dyn SecretStore>>,
        env: Arc<dyn Environment>,
        clock: Arc<dyn Clock>,
        output: Arc<dyn Output>,
        ttl: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            env,
            clock,
            output,
            cache: TtlCache::new(ttl),
        }
    }

    /// Resolve the configuration for a service.
    ///
    /// Unknown services are logged and yield `None`. A fresh cache entry is
    /// returned without touching the backend; otherwise every declared key
    /// is re-fetched and the cache entry is replaced regardless of how many
    /// individual lookups succeeded.
    pub fn get_service_config(&self, service_name: &str) -> Option<ServiceConfig> {
        let Some(entry) = self.registry.get(service_name) else {
            self.output
                .error(&format!("Unknown service: {}", service_name));
            return None;
        };
        let metadata = entry.clone();

        let now = self.clock.now();
        if let Some(cached) = self.cache.get_fresh(service_name, now) {
            return Some(ServiceConfig {
                service_name: service_name.to_string(),
                config: cached.config,
                secrets: cached.secrets,
                metadata,
            });
        }

        let config = self.resolve_keys(service_name, &metadata.config_keys, Namespace::Config);
        let secrets = self.resolve_keys(service_name, &metadata.secret_keys, Namespace::Secret);

        self.cache
            .insert(service_name, config.clone(), secrets.clone(), now);

        Some(ServiceConfig {
            service_name: service_name.to_string(),
            config,
            secrets,
            metadata,
        })
    }

    /// Resolve a single non-secret configuration value
    pub fn get_config_value(&self, service_name: &str, key: &str) -> Option<String> {
        self.get_service_config(service_name)?.config.get(key).cloned()
    }

    /// Resolve a single secret value
    pub fn get_secret_value(&self, service_name: &str, key: &str) -> Option<String> {
        self.get_service_config(service_name)?.secrets.get(key).cloned()
    }

    /// Registry metadata for a service
    pub fn service_metadata(&self, service_name: &str) -> Option<&ServiceEntry> {
        self.registry.get(service_name)
    }

    /// All registered service names
    pub fn list_services(&self) -> Vec<&str> {
        self.registry.service_names()
    }

    /// The underlying registry
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    fn resolve_keys(
        &self,
        service_name: &str,
        keys: &[String],
        namespace: Namespace,
    ) -> HashMap<String, String> {
        let mut values = HashMap::new();

        for key in keys {
            if let Some(value) = self.resolve_key(service_name, key, &namespace) {
                values.insert(key.clone(), value);
            }
        }

        values
    }

    fn resolve_key(&self, service_name: &str, key: &str, namespace: &Namespace) -> Option<String> {
        if let Some(store) = &self.store {
            let backend_key = format!("{}_{}", service_name, key);
            let lookup = match namespace {
                Namespace::Config => store.get_config(&backend_key),
                Namespace::Secret => store.get_secret(&backend_key),
            };

            match lookup {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(err) => {
                    // Treated as a miss: availability over strictness
                    self.output.warning(&format!(
                        "Backend lookup failed for {}: {}",
                        backend_key, err
                    ));
                }
            }
        }

        let env_key = format!(
            "{}_{}",
            service_name.to_uppercase(),
            key.to_uppercase()
        );
        self.env.get(&env_key)
    }
}
