//! HTTP client for downloading promotion files by URL.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::IngestError;

/// Downloads remote promotion files.
///
/// Only an HTTP 200 with a non-empty body counts as a successful download;
/// anything else is reported as [`IngestError::Download`].
#[derive(Debug, Clone)]
pub struct RemoteFileClient {
    client: Client,
}

impl RemoteFileClient {
    /// Creates a client whose requests give up after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Download`] on transport failure or timeout, on
    /// any status other than 200, or when the body is empty.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let download_error = |reason: String| IngestError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(download_error(format!(
                "unexpected HTTP status {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;
        if body.is_empty() {
            return Err(download_error("empty response body".to_string()));
        }

        tracing::debug!(url, bytes = body.len(), "downloaded promotions file");
        Ok(body.to_vec())
    }
}
