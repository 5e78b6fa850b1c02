use crate::domain::{AudioSample, Label};

/// One forward pass of a learned classifier over a waveform.
///
/// `confidence` is the softmax probability of the winning class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrediction {
    pub label: Label,
    pub confidence: f32,
}

/// A learned human/machine classifier.
///
/// Implementations are loaded once at startup and shared read-only across
/// requests. Inference failures are recoverable by design: callers fall back
/// to the heuristic verdict instead of failing the request.
pub trait AmdModel: Send + Sync {
    fn classify(&self, sample: &AudioSample) -> Result<ModelPrediction, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model loading failed: {0}")]
    LoadFailed(String),
    #[error("model inference failed: {0}")]
    InferenceFailed(String),
}
