use candle_core::{Device, Tensor, D};
use candle_nn::VarBuilder;
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use serde::Deserialize;

use crate::application::ports::{AmdModel, ModelError, ModelPrediction};
use crate::domain::{AudioSample, Label};

use super::wav2vec2::{Wav2Vec2Config, Wav2Vec2SequenceClassifier};

fn default_sampling_rate() -> u32 {
    16_000
}

/// Subset of `preprocessor_config.json` that affects inference input.
#[derive(Debug, Clone, Deserialize)]
struct PreprocessorConfig {
    #[serde(default)]
    do_normalize: bool,
    #[serde(default = "default_sampling_rate")]
    sampling_rate: u32,
}

/// Candle-backed wav2vec2 classifier, loaded by name from the Hugging Face
/// hub and held immutable for the process lifetime.
pub struct CandleAmdEngine {
    model: Wav2Vec2SequenceClassifier,
    normalize_input: bool,
    device: Device,
}

impl CandleAmdEngine {
    pub fn new(model_id: &str, device: &Device) -> Result<Self, ModelError> {
        tracing::info!(model = model_id, device = ?device, "Loading AMD classification model");

        let api = Api::new().map_err(|e| ModelError::LoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| ModelError::LoadFailed(format!("config.json: {}", e)))?;
        let preprocessor_path = repo
            .get("preprocessor_config.json")
            .map_err(|e| ModelError::LoadFailed(format!("preprocessor_config.json: {}", e)))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| ModelError::LoadFailed(format!("model.safetensors: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| ModelError::LoadFailed(format!("read config: {}", e)))?;
        let config: Wav2Vec2Config = serde_json::from_str(&config_contents)
            .map_err(|e| ModelError::LoadFailed(format!("parse config: {}", e)))?;

        let preprocessor_contents = std::fs::read_to_string(&preprocessor_path)
            .map_err(|e| ModelError::LoadFailed(format!("read preprocessor config: {}", e)))?;
        let preprocessor: PreprocessorConfig = serde_json::from_str(&preprocessor_contents)
            .map_err(|e| ModelError::LoadFailed(format!("parse preprocessor config: {}", e)))?;

        if preprocessor.sampling_rate != crate::domain::SAMPLE_RATE {
            return Err(ModelError::LoadFailed(format!(
                "model expects {} Hz input, pipeline produces {} Hz",
                preprocessor.sampling_rate,
                crate::domain::SAMPLE_RATE
            )));
        }

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], candle_core::DType::F32, device)
                .map_err(|e| ModelError::LoadFailed(format!("weights: {}", e)))?
        };

        let model = Wav2Vec2SequenceClassifier::load(&config, vb)
            .map_err(|e| ModelError::LoadFailed(format!("model: {}", e)))?;

        tracing::info!(model = model_id, "AMD classification model loaded");

        Ok(Self {
            model,
            normalize_input: preprocessor.do_normalize,
            device: device.clone(),
        })
    }

    /// Zero-mean unit-variance normalization, the processor step the
    /// checkpoint was trained with.
    fn prepare_input(&self, samples: &[f32]) -> Vec<f32> {
        if !self.normalize_input {
            return samples.to_vec();
        }
        let n = samples.len() as f32;
        let mean = samples.iter().sum::<f32>() / n;
        let variance = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / n;
        let denom = (variance + 1e-7).sqrt();
        samples.iter().map(|s| (s - mean) / denom).collect()
    }
}

impl AmdModel for CandleAmdEngine {
    fn classify(&self, sample: &AudioSample) -> Result<ModelPrediction, ModelError> {
        let input = self.prepare_input(sample.samples());
        let len = input.len();

        let input_values = Tensor::from_vec(input, (1, len), &self.device)
            .map_err(|e| ModelError::InferenceFailed(format!("input tensor: {}", e)))?;

        let logits = self
            .model
            .forward(&input_values)
            .map_err(|e| ModelError::InferenceFailed(format!("forward: {}", e)))?;

        let probabilities: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .map_err(|e| ModelError::InferenceFailed(format!("softmax: {}", e)))?
            .squeeze(0)
            .and_then(|t| t.to_vec1())
            .map_err(|e| ModelError::InferenceFailed(e.to_string()))?;

        let (predicted_class, confidence) = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &p)| (i, p))
            .ok_or_else(|| ModelError::InferenceFailed("empty logits".to_string()))?;

        // Class 1 is human speech, class 0 an automated greeting
        let label = if predicted_class == 1 {
            Label::Human
        } else {
            Label::Machine
        };

        tracing::debug!(
            class = predicted_class,
            confidence = confidence,
            "Model forward pass completed"
        );

        Ok(ModelPrediction { label, confidence })
    }
}
