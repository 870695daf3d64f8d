//! Pulumi-ESC-style secret backend client.
//!
//! Environments are addressed as `{organization}/{project}/{environment}`;
//! individual values live under flat config/secret names inside the
//! environment document. Bodies on the wire are JSON-encoded values.

use super::http::{HttpClient, ReqwestClient};
use super::store::{SecretStore, StoreHealth};
use crate::traits::Environment;
use anyhow::{Context, Result};
use serde_json::Value;

const DEFAULT_API_URL: &str = "https://api.pulumi.com/api/esc";
const DEFAULT_ORGANIZATION: &str = "ai-cherry";
const DEFAULT_PROJECT: &str = "sophia";
const DEFAULT_ENVIRONMENT: &str = "production";

/// Client for the remote configuration/secrets backend.
pub struct EscClient<H: HttpClient> {
    api_url: String,
    organization: String,
    project: String,
    environment: String,
    access_token: String,
    http: H,
}

impl EscClient<ReqwestClient> {
    /// Build a client from process configuration.
    ///
    /// Returns `None` when `PULUMI_ACCESS_TOKEN` is unset: the caller is
    /// expected to run in environment-variable-only mode in that case.
    pub fn from_environment(env: &dyn Environment) -> Result<Option<Self>> {
        let access_token = match env.get("PULUMI_ACCESS_TOKEN") {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };

        let client = Self {
            api_url: env
                .get("PULUMI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            organization: env
                .get("PULUMI_ORGANIZATION")
                .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string()),
            project: env
                .get("PULUMI_PROJECT")
                .unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            environment: env
                .get("SOPHIA_ENVIRONMENT")
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            access_token,
            http: ReqwestClient::new()?,
        };

        Ok(Some(client))
    }
}

impl<H: HttpClient> EscClient<H> {
    /// Create a client with a custom HTTP client (for testing)
    #[allow(dead_code)]
    pub fn with_client(
        organization: &str,
        project: &str,
        environment: &str,
        access_token: &str,
        http: H,
    ) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            organization: organization.to_string(),
            project: project.to_string(),
            environment: environment.to_string(),
            access_token: access_token.to_string(),
            http,
        }
    }

    /// The `{organization}/{project}/{environment}` address of this client
    pub fn environment_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.organization, self.project, self.environment
        )
    }

    fn environment_url(&self) -> String {
        format!(
            "{}/environments/{}/{}/{}",
            self.api_url, self.organization, self.project, self.environment
        )
    }

    fn value_url(&self, namespace: &str, key: &str) -> String {
        format!("{}/{}/{}", self.environment_url(), namespace, key)
    }

    fn get_value(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let url = self.value_url(namespace, key);
        let body = match self.http.get(&url, &self.access_token)? {
            Some(body) => body,
            None => return Ok(None),
        };

        let value: Value = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse backend response for key: {}", key))?;

        Ok(Some(render_value(&value)))
    }
}

/// Render a backend JSON value as the flat string callers consume
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<H: HttpClient> SecretStore for EscClient<H> {
    fn get_config(&self, key: &str) -> Result<Option<String>> {
        self.get_value("values", key)
    }

    fn get_secret(&self, key: &str) -> Result<Option<String>> {
        self.get_value("secrets", key)
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<()> {
        let url = self.value_url("secrets", key);
        let body = serde_json::to_string(&Value::String(value.to_string()))?;
        self.http.put(&url, &self.access_token, &body)
    }

    fn health_check(&self) -> StoreHealth {
        match self.http.get(&self.environment_url(), &self.access_token) {
            Ok(Some(_)) => StoreHealth::Healthy,
            Ok(None) => StoreHealth::Unhealthy(format!(
                "environment not found: {}",
                self.environment_path()
            )),
            Err(err) => StoreHealth::Unhealthy(err.to_string()),
        }
    }
}
