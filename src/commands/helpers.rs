use crate::context::Context;
use crate::registry::{RegistrySource, ServiceRegistry};
use crate::resolver::ConfigResolver;
use crate::secrets::{EscClient, SecretStore};
use crate::traits::FileSystem;
use anyhow::{Context as AnyhowContext, Result, bail};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Build the secret backend client, when an access token is configured
pub fn build_store(ctx: &Context) -> Result<Option<Arc<dyn SecretStore>>> {
    let client = EscClient::from_environment(&*ctx.env)?;
    Ok(client.map(|client| Arc::new(client) as Arc<dyn SecretStore>))
}

/// Build a resolver over the loaded registry and the optional backend
pub fn build_resolver(ctx: &Context) -> Result<ConfigResolver> {
    let store = build_store(ctx)?;
    let registry = ServiceRegistry::load(&*ctx.fs, &*ctx.env, &*ctx.output, store.as_deref());

    Ok(ConfigResolver::new(
        registry,
        store,
        ctx.env.clone(),
        ctx.clock.clone(),
        ctx.output.clone(),
    ))
}

/// Human-readable description of where the registry was loaded from
pub fn describe_source(source: &RegistrySource) -> String {
    match source {
        RegistrySource::Backend => "secret backend".to_string(),
        RegistrySource::File(path) => format!("file {}", path.display()),
        RegistrySource::BuiltIn => "built-in defaults".to_string(),
    }
}

/// Load a JSON object sample record from a file
pub fn load_sample(fs: &dyn FileSystem, path: &str) -> Result<Map<String, Value>> {
    let contents = fs
        .read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read sample file: {}", path))?;

    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Sample file is not valid JSON: {}", path))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("Sample file must contain a JSON object: {}", path),
    }
}
