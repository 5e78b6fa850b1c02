use std::sync::Arc;

use candle_core::Device;

use crate::application::ports::AmdModel;

use super::candle_engine::CandleAmdEngine;

/// Which classifier the startup fallback chain resolved to. Decided once
/// per process and never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCapability {
    FineTuned,
    Fallback,
    HeuristicOnly,
}

impl ModelCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCapability::FineTuned => "fine_tuned",
            ModelCapability::Fallback => "fallback",
            ModelCapability::HeuristicOnly => "heuristic_only",
        }
    }
}

/// Immutable bundle of everything inference needs, built once at startup and
/// injected into request handlers.
pub struct InferenceContext {
    capability: ModelCapability,
    model: Option<Arc<dyn AmdModel>>,
    device_label: String,
}

impl InferenceContext {
    /// Resolve the model fallback chain: fine-tuned checkpoint, then the
    /// generic base checkpoint, then heuristic-only for the process
    /// lifetime. Load failures are logged, never propagated.
    pub fn initialize(primary_model: &str, fallback_model: &str) -> Self {
        let device = Device::cuda_if_available(0).unwrap_or(Device::Cpu);
        let device_label = device_label(&device).to_string();

        match CandleAmdEngine::new(primary_model, &device) {
            Ok(engine) => {
                return Self {
                    capability: ModelCapability::FineTuned,
                    model: Some(Arc::new(engine)),
                    device_label,
                };
            }
            Err(e) => {
                tracing::warn!(
                    model = primary_model,
                    error = %e,
                    "Primary model unavailable, attempting fallback model"
                );
            }
        }

        match CandleAmdEngine::new(fallback_model, &device) {
            Ok(engine) => Self {
                capability: ModelCapability::Fallback,
                model: Some(Arc::new(engine)),
                device_label,
            },
            Err(e) => {
                tracing::warn!(
                    model = fallback_model,
                    error = %e,
                    "Fallback model unavailable, running heuristic-only"
                );
                Self {
                    capability: ModelCapability::HeuristicOnly,
                    model: None,
                    device_label,
                }
            }
        }
    }

    /// Context with a caller-supplied model, for wiring tests and scaffolds.
    pub fn with_model(capability: ModelCapability, model: Option<Arc<dyn AmdModel>>) -> Self {
        Self {
            capability,
            model,
            device_label: device_label(&Device::Cpu).to_string(),
        }
    }

    pub fn capability(&self) -> ModelCapability {
        self.capability
    }

    pub fn model(&self) -> Option<Arc<dyn AmdModel>> {
        self.model.clone()
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// The input processor configuration travels with the checkpoint, so it
    /// is present exactly when the model is.
    pub fn processor_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn device(&self) -> &str {
        &self.device_label
    }
}

fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}
