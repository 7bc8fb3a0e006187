//! HTTP client for registry requests and streamed downloads.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::Sender;

use super::error::classify_error;

/// Thin wrapper over a reqwest Client. Every failure is returned to the caller
/// as-is; nothing is retried.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let response = response.error_for_status().map_err(classify_error)?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Performs a GET request with query parameters and deserializes the JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let response = response.error_for_status().map_err(classify_error)?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Streams the body of `url` into `sink`, one chunk per message, in arrival order.
    ///
    /// Stops early without error when the receiving side hangs up. Returns the
    /// number of bytes forwarded.
    #[tracing::instrument(skip(self, sink))]
    pub async fn stream_to(&self, url: &str, sink: Sender<Vec<u8>>) -> Result<u64> {
        debug!("Streaming {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to start download from {}", url))?;

        let mut response = response.error_for_status().map_err(classify_error)?;

        let mut streamed_bytes: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            streamed_bytes += chunk.len() as u64;
            if sink.send(chunk.to_vec()).await.is_err() {
                debug!("Receiver closed after {} bytes, stopping download", streamed_bytes);
                break;
            }
        }

        debug!(
            "Streamed {:.2} KB from {}",
            streamed_bytes as f64 / 1024.0,
            url
        );

        Ok(streamed_bytes)
    }
}
