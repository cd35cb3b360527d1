use std::time::Duration;

use anyhow::Result;
use racefeed_core::catalog::NextRacesResponse;
use racefeed_core::{EventSource, RaceCatalog, SourceError};
use tracing::debug;

/// HTTP client for the racing API's `nextraces` listing.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    count: u32,
}

impl ApiClient {
    /// Create a new client with the given base URL, result-count hint and
    /// per-request timeout.
    pub fn new(base_url: &str, count: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, count))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str, count: u32) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            count,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn next_races(&self) -> Result<RaceCatalog, SourceError> {
        let count = self.count.to_string();
        let resp = self
            .client
            .get(self.url("/racing/"))
            .header("Content-Type", "application/json")
            .query(&[("method", "nextraces"), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let body: NextRacesResponse = parse_response(resp).await?;
        let catalog = body.into_catalog();
        debug!("nextraces returned {} summaries", catalog.len());
        Ok(catalog)
    }
}

impl EventSource for ApiClient {
    async fn fetch(&self) -> Result<RaceCatalog, SourceError> {
        self.next_races().await
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and body text.
async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, SourceError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode(e.to_string()))
}
