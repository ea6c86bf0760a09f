//! HTTP fetch helper shared by the source adapters
//!
//! One client, one uniform per-request timeout, one fixed politeness
//! delay between consecutive requests to the same source. Non-success
//! statuses and transport errors surface as [`SourceError`] so the
//! adapters can degrade a source without failing the run.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::errors::SourceError;

/// Thin wrapper around `reqwest::Client` with uniform timeout handling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    request_delay: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, request_delay: Duration, user_agent: &str) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            request_delay,
        }
    }

    /// Fetch a URL as text. Invalid UTF-8 is replaced rather than
    /// failing the fetch.
    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let bytes = self.get_bytes(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fetch a URL as raw bytes.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::unavailable(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::unavailable(url, e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Fetch and deserialize a JSON document. Transport failures map to
    /// `Unavailable`, decode failures to `Malformed`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|e| SourceError::malformed(url, e.to_string()))
    }

    /// Sleep for the configured inter-request delay.
    pub async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}
