//! HTTP client for the generation service's two endpoints.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

use parley_core::config::AiConfig;

use crate::error::GenError;
use crate::request::GenerateRequest;

/// Path of the generation endpoint.
pub const GENERATE_PATH: &str = "/api/v1/generate";

/// Path of the health endpoint used for reachability probes.
pub const HEALTH_PATH: &str = "/api/v1/model";

/// A `host:port` pair captured from a config snapshot at dispatch time.
///
/// Workers carry this value instead of re-reading the live config, so a
/// remote config update mid-flight cannot redirect an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from a host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Capture the endpoint out of a config snapshot.
    #[must_use]
    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.host.clone(), config.port)
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}:{}{path}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Thin `reqwest` wrapper; cheap to clone into each worker.
#[derive(Debug, Clone, Default)]
pub struct GenClient {
    http: reqwest::Client,
}

impl GenClient {
    /// Create a client with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// POST a generation request and return the trimmed completion text.
    ///
    /// # Errors
    ///
    /// - `GenError::Network` / `GenError::Timeout` on transport failure
    /// - `GenError::Status` on a non-success HTTP status
    /// - `GenError::MalformedResponse` when the body is not
    ///   `{results:[{text}]}`
    /// - `GenError::EmptyCompletion` when the trimmed text is empty
    pub async fn generate(
        &self,
        endpoint: &Endpoint,
        request: &GenerateRequest,
        timeout: Duration,
    ) -> Result<String, GenError> {
        let response = self
            .http
            .post(endpoint.url(GENERATE_PATH))
            .json(request)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenError::MalformedResponse(e.to_string()))?;

        let text = body["results"][0]["text"]
            .as_str()
            .ok_or_else(|| GenError::MalformedResponse("missing results[0].text".to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(GenError::EmptyCompletion);
        }
        Ok(text.to_string())
    }

    /// Probe the health endpoint; reachable iff HTTP 200 within `timeout`.
    pub async fn probe(&self, endpoint: &Endpoint, timeout: Duration) -> bool {
        match self
            .http
            .get(endpoint.url(HEALTH_PATH))
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }
}
