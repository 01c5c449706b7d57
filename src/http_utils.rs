//! HTTP utilities for the gmb client.
//!
//! This module wraps a shared `reqwest` client so that every API call sends
//! the same default headers, uses the same timeout and decodes responses the
//! same way.

use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, trace};
use url::Url;

use crate::api::ApiError;
use crate::endpoints::HttpMethod;

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Default headers to include with all requests
    pub default_headers: HashMap<String, String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for HttpRequestConfig {
    fn default() -> Self {
        Self::with_timeout(crate::configuration::DEFAULT_TIMEOUT_SECS)
    }
}

impl HttpRequestConfig {
    pub fn with_timeout(timeout: u64) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            "User-Agent".to_string(),
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        );

        Self {
            default_headers,
            timeout,
        }
    }

    pub fn from_configuration(configuration: &crate::configuration::Configuration) -> Self {
        Self::with_timeout(configuration.timeout())
    }
}

/// HTTP client wrapper with common request handling logic
#[derive(Clone)]
pub struct HttpClient {
    /// The reqwest client instance
    pub client: Arc<Client>,
    /// Configuration for the HTTP client
    config: HttpRequestConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpRequestConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// The underlying connection pool, shared with the token exchange.
    pub fn inner(&self) -> Client {
        self.client.as_ref().clone()
    }

    /// Send a request with a bearer token and decode the JSON response body.
    ///
    /// An empty success body decodes to an empty JSON object.
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: Url,
        auth_token: &str,
    ) -> Result<Value, ApiError> {
        debug!("{} {}", method, url);

        let mut request = match method {
            HttpMethod::Get => self.client.get(url.clone()),
            // an explicit empty body makes reqwest send Content-Length: 0
            HttpMethod::Post => self.client.post(url.clone()).body(""),
        };

        request = request.header("Authorization", format!("Bearer {}", auth_token));

        // Add default headers
        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        let response_text = response.text().await?;
        trace!("Raw response text for deserialization: {}", response_text);

        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status,
                url: url.to_string(),
                body: response_text,
            });
        }

        if response_text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        match serde_json::from_str::<Value>(&response_text) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(
                    "Failed to deserialize response: {}. Raw response: {}",
                    e, response_text
                );
                Err(ApiError::JsonError(e))
            }
        }
    }
}
