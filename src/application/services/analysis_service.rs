use std::sync::Arc;

use crate::application::ports::{AmdModel, AudioDecoder, AudioDecoderError, ModelPrediction};
use crate::application::services::{FeatureError, FeatureExtractor, HeuristicScorer};
use crate::domain::{AudioSample, AudioSampleError, Verdict};

/// Full classification pipeline: decode, normalize, extract features, score,
/// and optionally fuse with the learned model.
///
/// Holds no mutable state; one instance is shared across all requests.
pub struct AnalysisService {
    decoder: Arc<dyn AudioDecoder>,
    extractor: FeatureExtractor,
    scorer: HeuristicScorer,
    model: Option<Arc<dyn AmdModel>>,
}

impl AnalysisService {
    pub fn new(
        decoder: Arc<dyn AudioDecoder>,
        model: Option<Arc<dyn AmdModel>>,
        scorer: HeuristicScorer,
    ) -> Self {
        Self {
            decoder,
            extractor: FeatureExtractor::new(),
            scorer,
            model,
        }
    }

    /// Classify encoded audio bytes.
    ///
    /// Model inference failure is not an error: the request degrades to the
    /// heuristic verdict and the failure is only logged.
    pub fn analyze(&self, data: &[u8]) -> Result<Verdict, AnalysisError> {
        let pcm = self.decoder.decode(data)?;
        let sample = AudioSample::from_pcm(pcm)?;
        let features = self.extractor.extract(&sample)?;
        let heuristic = self.scorer.score(&features);

        tracing::debug!(
            duration_secs = features.duration,
            heuristic_label = %heuristic.label,
            heuristic_confidence = heuristic.confidence,
            "Heuristic scoring completed"
        );

        let verdict = match &self.model {
            Some(model) => match model.classify(&sample) {
                Ok(prediction) => {
                    let fused = fuse_verdicts(&heuristic, prediction);
                    tracing::debug!(
                        model_label = %prediction.label,
                        model_confidence = prediction.confidence,
                        fused_confidence = fused.confidence,
                        "Model prediction fused with heuristic"
                    );
                    fused
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Model inference failed, keeping heuristic verdict");
                    heuristic
                }
            },
            None => heuristic,
        };

        Ok(verdict)
    }
}

/// Blend a model prediction into the heuristic verdict.
///
/// The model's label always wins; confidences are averaged. The heuristic
/// label is discarded even when its confidence exceeds the model's, which is
/// kept for compatibility with established caller behavior.
pub fn fuse_verdicts(heuristic: &Verdict, model: ModelPrediction) -> Verdict {
    Verdict {
        label: model.label,
        confidence: (heuristic.confidence + model.confidence) / 2.0,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("decode: {0}")]
    Decode(#[from] AudioDecoderError),
    #[error("preprocess: {0}")]
    Preprocess(#[from] AudioSampleError),
    #[error("features: {0}")]
    Features(#[from] FeatureError),
}
