use anyhow::{Context, Result, bail};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client trait for testing
pub trait HttpClient: Send + Sync {
    /// GET a resource. Returns the body, or None when the resource is absent (404).
    fn get(&self, url: &str, token: &str) -> Result<Option<String>>;

    /// PUT a resource body, creating or replacing it.
    fn put(&self, url: &str, token: &str, body: &str) -> Result<()>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client with the default request timeout
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, token: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .with_context(|| format!("Failed to fetch URL: {}", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from: {}", url))?;

        Ok(Some(body))
    }

    fn put(&self, url: &str, token: &str, body: &str) -> Result<()> {
        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .with_context(|| format!("Failed to send PUT request to: {}", url))?;

        if !response.status().is_success() {
            bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        Ok(())
    }
}
