//! HTTP client for an engine exposing a standard GraphQL endpoint

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use super::{Engine, ExecutionResult};
use crate::common::config::EngineConfig;
use crate::common::{truncate, Error, Result};

/// Engine reached over HTTP (`POST {"query", "variables"}`)
pub struct HttpEngine {
    client: reqwest::Client,
    url: String,
    headers: HeaderMap,
}

impl HttpEngine {
    /// Build a client from configuration
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let url = reqwest::Url::parse(&config.url).map_err(|e| {
            Error::EngineInit(format!("invalid engine url '{}': {}", config.url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::EngineInit(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                Error::EngineInit(format!("invalid value for header '{}': {}", name.as_str(), e))
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::EngineInit(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
            headers,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Engine for HttpEngine {
    async fn execute(&self, query: &str, variables: &serde_json::Value) -> Result<ExecutionResult> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Engine(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Engine(format!("failed to read engine response: {}", e)))?;

        tracing::trace!(%status, bytes = bytes.len(), "Engine responded");

        let decoded = ExecutionResult::from_response_body(&bytes);
        if status.is_success() {
            return decoded.map_err(|e| Error::Engine(format!("invalid engine response: {}", e)));
        }

        // A failed status only counts as an answer when it carries GraphQL errors
        match decoded {
            Ok(result) if !result.errors.is_empty() => Ok(result),
            _ => Err(Error::Engine(format!(
                "engine returned HTTP {}: {}",
                status,
                truncate(String::from_utf8_lossy(&bytes).trim(), 200)
            ))),
        }
    }
}
