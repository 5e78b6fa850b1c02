/// Decodes encoded audio bytes into 16 kHz mono f32 PCM.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<Vec<f32>, AudioDecoderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioDecoderError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
}
