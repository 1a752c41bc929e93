use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Thin reqwest wrapper shared by provider adapters.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an existing client (custom TLS, proxies, test servers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// GETs `url` and decodes a JSON body. Non-2xx responses are errors.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(TransportError::Decode)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
