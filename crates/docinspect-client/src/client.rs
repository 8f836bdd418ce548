//! Resource API client implementation.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use docinspect_core::{logging, normalize, AccessToken, DocumentChunk, DocumentChunkId, Error, Result};

use crate::config::ApiConfig;

/// Timeout for the health probe, independent of the configured timeout.
const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Authenticated client for the document chunk endpoint.
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(secs));
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(url = %config.base_url, "Initializing resource API client");

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `{base}/items/{id}/itemspec`, with the id used verbatim.
    pub fn resource_url(&self, id: &DocumentChunkId) -> String {
        format!(
            "{}/items/{}/itemspec",
            self.config.base_url.trim_end_matches('/'),
            id.as_str()
        )
    }

    /// Build a GET request with bearer authentication and JSON negotiation.
    fn build_get_request(&self, url: &str, token: &AccessToken) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(token.secret())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }

    /// Fetch and normalize one document chunk.
    #[instrument(skip(self, token), fields(subsystem = "client", op = "fetch_resource", document_chunk_id = %id))]
    pub async fn fetch_resource(
        &self,
        id: &DocumentChunkId,
        token: &AccessToken,
    ) -> Result<DocumentChunk> {
        let url = self.resource_url(id);
        debug!(url = %url, token = %token, "Requesting document chunk");

        let response = self
            .build_get_request(&url, token)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        debug!({ logging::HTTP_STATUS } = status.as_u16(), "Resource API responded");

        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED => Error::AuthExpired,
                StatusCode::FORBIDDEN => Error::AccessDenied,
                StatusCode::NOT_FOUND => Error::ResourceNotFound(id.to_string()),
                _ => {
                    let body = response.text().await.map_err(|e| {
                        Error::Transport(format!("Failed to read error body: {}", e))
                    })?;
                    warn!(
                        { logging::HTTP_STATUS } = status.as_u16(),
                        { logging::RESPONSE_LEN } = body.len(),
                        "Resource API error"
                    );
                    Error::ApiError {
                        status: status.as_u16(),
                        body,
                    }
                }
            });
        }

        let payload: JsonValue = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Failed to parse response: {}", e)))?;

        let chunk = normalize(&payload, id);
        info!(title = %chunk.metadata.title, "Document chunk fetched");
        Ok(chunk)
    }

    /// Probe `{base}/health`. Never fails; any problem reads as unhealthy.
    #[instrument(skip(self, token), fields(subsystem = "client", op = "health_check"))]
    pub async fn health_check(&self, token: &AccessToken) -> bool {
        let url = format!("{}/health", self.config.base_url.trim_end_matches('/'));
        let response = self
            .build_get_request(&url, token)
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!("Resource API health check passed");
                    true
                } else {
                    warn!(
                        { logging::HTTP_STATUS } = resp.status().as_u16(),
                        "Resource API health check failed"
                    );
                    false
                }
            }
            Err(e) => {
                warn!(error = %e, "Resource API health check error");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(ApiConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_resource_url() {
        let client = client("https://api.example.com/api/document");
        let id = DocumentChunkId::new("doc-12345-chunk-67890");
        assert_eq!(
            client.resource_url(&id),
            "https://api.example.com/api/document/items/doc-12345-chunk-67890/itemspec"
        );
    }

    #[test]
    fn test_resource_url_trims_trailing_slash() {
        let client = client("https://api.example.com/api/document/");
        let id = DocumentChunkId::new("x");
        assert_eq!(
            client.resource_url(&id),
            "https://api.example.com/api/document/items/x/itemspec"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = ApiClient::new(ApiConfig::default().with_base_url("ftp://example.com"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_config_accessor() {
        let client = client("http://localhost:9000");
        assert_eq!(client.config().base_url, "http://localhost:9000");
    }
}
