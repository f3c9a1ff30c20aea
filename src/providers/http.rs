use async_trait::async_trait;
use log::debug;
use reqwest::{Client, header};
use serde_json::Value;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::ClientError;
use crate::translation::BatchPayload;
use crate::translation::protocol::parse_response_body;

use super::TranslationBackend;

/// Maximum characters of an error body kept in `HttpError`
const ERROR_EXCERPT_CHARS: usize = 500;

/// HTTP client for the batch translation endpoint
#[derive(Debug)]
pub struct HttpBackend {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL receiving the POST
    endpoint: String,
    /// Auth header name and value
    auth: Option<(String, String)>,
    /// Per-request timeout, kept for error messages
    timeout: Duration,
}

impl HttpBackend {
    /// Create a new client for `endpoint`
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        auth: Option<(String, String)>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth,
            timeout,
        })
    }

    /// Create a client from the endpoint, key and timeout of a configuration
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let auth = config
            .auth_header_value()
            .map(|value| (config.auth_header.trim().to_string(), value));
        Self::new(config.api_url.trim(), Duration::from_millis(config.timeout_ms), auth)
    }

    fn describe_transport_error(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            format!("request to {} timed out after {:?}", self.endpoint, self.timeout)
        } else {
            format!("failed to send request to {}: {}", self.endpoint, error)
        }
    }
}

#[async_trait]
impl TranslationBackend for HttpBackend {
    async fn send_batch(&self, payload: &BatchPayload) -> Result<Value, ClientError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(payload);
        if let Some((name, value)) = &self.auth {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(self.describe_transport_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(self.describe_transport_error(&e)))?;
        debug!("{} answered {} with {} byte(s)", self.endpoint, status, body.len());

        if !status.is_success() {
            return Err(ClientError::HttpError {
                status: status.as_u16(),
                excerpt: body.chars().take(ERROR_EXCERPT_CHARS).collect(),
            });
        }

        parse_response_body(&body)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}
