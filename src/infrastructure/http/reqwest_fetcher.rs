use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{AudioFetchError, AudioFetcher};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches client-referenced audio over HTTP(S).
pub struct ReqwestAudioFetcher {
    client: reqwest::Client,
}

impl ReqwestAudioFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestAudioFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioFetcher for ReqwestAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AudioFetchError> {
        let response = self
            .client
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| AudioFetchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(AudioFetchError::BadStatus {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AudioFetchError::RequestFailed(format!("body: {}", e)))?;

        tracing::debug!(url = %url, bytes = bytes.len(), "Audio fetched");

        Ok(bytes.to_vec())
    }
}
