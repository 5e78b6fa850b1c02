use async_trait::async_trait;

/// Retrieves raw audio bytes from a client-supplied URL.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AudioFetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioFetchError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unexpected status {status}: {message}")]
    BadStatus { status: u16, message: String },
}
