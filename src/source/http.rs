//! Backend HTTP client
//!
//! Plain GETs against the Healthsome backend: no body, no custom headers,
//! no retries.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{DataSource, FetchError};

/// Connection settings for [`HttpDataSource`]
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Backend origin (e.g. "http://localhost:5000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// [`DataSource`] backed by `reqwest`
pub struct HttpDataSource {
    client: Client,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path
    pub fn url_for(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{}", self.base_url, path_and_query)
        } else {
            format!("{}/{}", self.base_url, path_and_query)
        }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self, path_and_query: &str) -> Result<Value, FetchError> {
        let url = self.url_for(path_and_query);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(FetchError::from_transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: serde_json::from_str(&text).ok(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
