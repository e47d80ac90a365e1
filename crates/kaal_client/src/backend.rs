//! Transport to the chart backend.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// JSON-in, JSON-out access to backend endpoints.
///
/// Endpoints are paths relative to the API root, e.g. `chart/dasha`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn post_json(&self, endpoint: &str, body: Value) -> Result<Value, ClientError>;

    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ClientError>;
}

/// [`Backend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| ClientError::Transport {
                endpoint: config.base_url.clone(),
                source,
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn finish(&self, endpoint: &str, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let transport = |source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn post_json(&self, endpoint: &str, body: Value) -> Result<Value, ClientError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(%url, "POST");
        self.finish(endpoint, self.client.post(&url).json(&body)).await
    }

    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(%url, "GET");
        self.finish(endpoint, self.client.get(&url).query(query)).await
    }
}
