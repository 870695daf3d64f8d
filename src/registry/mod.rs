//! Static service registry.
//!
//! The registry declares, per external service, which configuration and
//! secret keys exist and how often secrets should rotate. It is loaded once
//! at startup: from the secret backend if one is configured, else from a
//! local JSON file, else from the built-in default set.

use crate::secrets::SecretStore;
use crate::traits::{Environment, FileSystem, Output};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Backend key under which a remote registry document may be published
const REGISTRY_BACKEND_KEY: &str = "service_registry";

/// Registry entry for one external service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Kind of service ("database", "api", "infrastructure")
    #[serde(rename = "type")]
    pub service_type: String,

    /// Non-secret configuration keys the service declares
    #[serde(default)]
    pub config_keys: Vec<String>,

    /// Secret keys the service declares
    #[serde(default)]
    pub secret_keys: Vec<String>,

    /// Rotation schedule in the form "<N>d"
    pub rotation_schedule: String,
}

/// Where the registry contents came from
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrySource {
    Backend,
    File(PathBuf),
    BuiltIn,
}

/// Registry of all known services
pub struct ServiceRegistry {
    services: BTreeMap<String, ServiceEntry>,
    source: RegistrySource,
}

impl ServiceRegistry {
    /// Load the registry: backend document first, then local file, then the
    /// built-in default set. Failures at each tier are logged and degrade to
    /// the next one.
    pub fn load(
        fs: &dyn FileSystem,
        env: &dyn Environment,
        output: &dyn Output,
        store: Option<&dyn SecretStore>,
    ) -> Self {
        if let Some(store) = store {
            match Self::load_from_backend(store) {
                Ok(Some(registry)) => return registry,
                Ok(None) => {}
                Err(err) => {
                    output.warning(&format!("Failed to load service registry from backend: {}", err));
                }
            }
        }

        let path = Self::registry_path(env);
        if fs.exists(&path) {
            match Self::load_from_file(fs, &path) {
                Ok(registry) => return registry,
                Err(err) => {
                    output.warning(&format!(
                        "Failed to load service registry from {:?}: {}",
                        path, err
                    ));
                }
            }
        }

        Self {
            services: default_services(),
            source: RegistrySource::BuiltIn,
        }
    }

    /// Build a registry directly from entries (for testing)
    #[cfg(test)]
    pub fn from_entries(entries: Vec<(&str, ServiceEntry)>) -> Self {
        Self {
            services: entries
                .into_iter()
                .map(|(name, entry)| (name.to_string(), entry))
                .collect(),
            source: RegistrySource::BuiltIn,
        }
    }

    fn load_from_backend(store: &dyn SecretStore) -> Result<Option<Self>> {
        let Some(document) = store.get_config(REGISTRY_BACKEND_KEY)? else {
            return Ok(None);
        };

        let services: BTreeMap<String, ServiceEntry> = serde_json::from_str(&document)
            .context("Backend service registry document is not valid JSON")?;

        Ok(Some(Self {
            services,
            source: RegistrySource::Backend,
        }))
    }

    fn load_from_file(fs: &dyn FileSystem, path: &PathBuf) -> Result<Self> {
        let contents = fs.read_to_string(path)?;
        let services: BTreeMap<String, ServiceEntry> = serde_json::from_str(&contents)
            .with_context(|| format!("Service registry file is not valid JSON: {:?}", path))?;

        Ok(Self {
            services,
            source: RegistrySource::File(path.clone()),
        })
    }

    /// Registry file location: $SERVICE_REGISTRY_PATH, or ~/.sophia/service_registry.json
    fn registry_path(env: &dyn Environment) -> PathBuf {
        if let Some(path) = env.get("SERVICE_REGISTRY_PATH") {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sophia")
            .join("service_registry.json")
    }

    /// Get a service entry by name
    pub fn get(&self, service_name: &str) -> Option<&ServiceEntry> {
        self.services.get(service_name)
    }

    /// Check if a service is registered
    pub fn contains(&self, service_name: &str) -> bool {
        self.services.contains_key(service_name)
    }

    /// Registered service names, sorted
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(|s| s.as_str()).collect()
    }

    /// Iterate over (name, entry) pairs, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ServiceEntry)> {
        self.services.iter()
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry has no entries
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Where this registry was loaded from
    pub fn source(&self) -> &RegistrySource {
        &self.source
    }
}

/// Parse a rotation schedule of the form "<N>d" into a day count
pub fn parse_rotation_schedule(schedule: &str) -> Result<u32> {
    let Some(days) = schedule.strip_suffix('d') else {
        bail!("Invalid rotation schedule (expected \"<N>d\"): {}", schedule);
    };

    let days: u32 = days
        .parse()
        .with_context(|| format!("Invalid rotation schedule (expected \"<N>d\"): {}", schedule))?;

    Ok(days)
}

fn entry(
    service_type: &str,
    config_keys: &[&str],
    secret_keys: &[&str],
    rotation_schedule: &str,
) -> ServiceEntry {
    ServiceEntry {
        service_type: service_type.to_string(),
        config_keys: config_keys.iter().map(|k| k.to_string()).collect(),
        secret_keys: secret_keys.iter().map(|k| k.to_string()).collect(),
        rotation_schedule: rotation_schedule.to_string(),
    }
}

/// Built-in default registry used when no backend or file registry exists
fn default_services() -> BTreeMap<String, ServiceEntry> {
    let mut services = BTreeMap::new();
    services.insert(
        "snowflake".to_string(),
        entry(
            "database",
            &["account", "warehouse", "database", "schema", "role"],
            &["user", "password"],
            "30d",
        ),
    );
    services.insert(
        "gong".to_string(),
        entry(
            "api",
            &["base_url"],
            &["api_key", "api_secret", "client_secret"],
            "60d",
        ),
    );
    services.insert(
        "vercel".to_string(),
        entry("api", &["team_id", "project_id", "org_id"], &["token"], "90d"),
    );
    services.insert(
        "estuary".to_string(),
        entry("api", &["api_url"], &["api_key"], "60d"),
    );
    services.insert(
        "lambda_labs".to_string(),
        entry(
            "infrastructure",
            &[],
            &["api_key", "jupyter_password", "ssh_public_key", "ssh_private_key"],
            "90d",
        ),
    );
    services.insert(
        "airbyte".to_string(),
        entry("api", &[], &["api_key", "password"], "60d"),
    );
    services.insert(
        "pinecone".to_string(),
        entry("api", &["environment"], &["api_key"], "90d"),
    );
    services.insert(
        "weaviate".to_string(),
        entry("api", &["url"], &["api_key"], "90d"),
    );
    services.insert(
        "openai".to_string(),
        entry("api", &[], &["api_key"], "30d"),
    );
    services.insert(
        "anthropic".to_string(),
        entry("api", &[], &["api_key"], "30d"),
    );
    services
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockEnvironment, MockFileSystem, MockOutput};
    use anyhow::Result;
    use std::path::Path;

    struct RegistryOnlyStore {
        document: Option<String>,
        fail: bool,
    }

    impl SecretStore for RegistryOnlyStore {
        fn get_config(&self, key: &str) -> Result<Option<String>> {
            if self.fail {
                anyhow::bail!("backend unreachable");
            }
            if key == REGISTRY_BACKEND_KEY {
                Ok(self.document.clone())
            } else {
                Ok(None)
            }
        }

        fn get_secret(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_secret(&self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }

        fn health_check(&self) -> crate::secrets::StoreHealth {
            crate::secrets::StoreHealth::Healthy
        }
    }

    #[test]
    fn test_builtin_defaults() {
        let fs = MockFileSystem::new();
        let env = MockEnvironment::new();
        let output = MockOutput::new();

        let registry = ServiceRegistry::load(&fs, &env, &output, None);

        assert_eq!(registry.source(), &RegistrySource::BuiltIn);
        assert_eq!(registry.len(), 10);
        assert!(registry.contains("snowflake"));
        assert!(registry.contains("anthropic"));

        let snowflake = registry.get("snowflake").unwrap();
        assert_eq!(snowflake.service_type, "database");
        assert_eq!(
            snowflake.config_keys,
            vec!["account", "warehouse", "database", "schema", "role"]
        );
        assert_eq!(snowflake.secret_keys, vec!["user", "password"]);
        assert_eq!(snowflake.rotation_schedule, "30d");
    }

    #[test]
    fn test_load_from_file() {
        let fs = MockFileSystem::new();
        let env = MockEnvironment::new().with_var("SERVICE_REGISTRY_PATH", "/etc/sophia/registry.json");
        let output = MockOutput::new();

        fs.write(
            Path::new("/etc/sophia/registry.json"),
            r#"{
                "postgres": {
                    "type": "database",
                    "config_keys": ["host", "port", "database"],
                    "secret_keys": ["user", "password"],
                    "rotation_schedule": "30d"
                }
            }"#,
        )
        .unwrap();

        let registry = ServiceRegistry::load(&fs, &env, &output, None);

        assert_eq!(
            registry.source(),
            &RegistrySource::File(PathBuf::from("/etc/sophia/registry.json"))
        );
        assert_eq!(registry.service_names(), vec!["postgres"]);
    }

    #[test]
    fn test_invalid_file_degrades_to_builtin() {
        let fs = MockFileSystem::new();
        let env = MockEnvironment::new().with_var("SERVICE_REGISTRY_PATH", "/etc/sophia/registry.json");
        let output = MockOutput::new();

        fs.write(Path::new("/etc/sophia/registry.json"), "not json").unwrap();

        let registry = ServiceRegistry::load(&fs, &env, &output, None);

        assert_eq!(registry.source(), &RegistrySource::BuiltIn);
        assert!(output.has_warning());
    }

    #[test]
    fn test_load_from_backend() {
        let fs = MockFileSystem::new();
        let env = MockEnvironment::new();
        let output = MockOutput::new();
        let store = RegistryOnlyStore {
            document: Some(
                r#"{"gong": {"type": "api", "config_keys": ["base_url"], "secret_keys": ["api_key"], "rotation_schedule": "60d"}}"#
                    .to_string(),
            ),
            fail: false,
        };

        let registry = ServiceRegistry::load(&fs, &env, &output, Some(&store));

        assert_eq!(registry.source(), &RegistrySource::Backend);
        assert_eq!(registry.service_names(), vec!["gong"]);
    }

    #[test]
    fn test_backend_failure_degrades_with_warning() {
        let fs = MockFileSystem::new();
        let env = MockEnvironment::new();
        let output = MockOutput::new();
        let store = RegistryOnlyStore {
            document: None,
            fail: true,
        };

        let registry = ServiceRegistry::load(&fs, &env, &output, Some(&store));

        assert_eq!(registry.source(), &RegistrySource::BuiltIn);
        assert!(output.has_warning());
    }

    #[test]
    fn test_parse_rotation_schedule() {
        assert_eq!(parse_rotation_schedule("30d").unwrap(), 30);
        assert_eq!(parse_rotation_schedule("90d").unwrap(), 90);
        assert!(parse_rotation_schedule("monthly").is_err());
        assert!(parse_rotation_schedule("d").is_err());
        assert!(parse_rotation_schedule("30").is_err());
    }
}
