use std::sync::Arc;

use amdetect::application::ports::{AmdModel, ModelError, ModelPrediction};
use amdetect::domain::{AudioSample, Label};
use amdetect::infrastructure::model::{InferenceContext, ModelCapability};

struct AlwaysHuman;

impl AmdModel for AlwaysHuman {
    fn classify(&self, _sample: &AudioSample) -> Result<ModelPrediction, ModelError> {
        Ok(ModelPrediction {
            label: Label::Human,
            confidence: 0.75,
        })
    }
}

#[test]
fn given_no_model_when_building_context_then_reports_heuristic_only() {
    let context = InferenceContext::with_model(ModelCapability::HeuristicOnly, None);

    assert!(!context.model_loaded());
    assert!(!context.processor_loaded());
    assert!(context.model().is_none());
    assert_eq!(context.capability(), ModelCapability::HeuristicOnly);
    assert_eq!(context.device(), "cpu");
}

#[test]
fn given_loaded_model_when_building_context_then_exposes_it_as_shared() {
    let context =
        InferenceContext::with_model(ModelCapability::FineTuned, Some(Arc::new(AlwaysHuman)));

    assert!(context.model_loaded());
    assert!(context.processor_loaded());
    assert!(context.model().is_some());
    assert_eq!(context.capability(), ModelCapability::FineTuned);
}

#[test]
fn given_capabilities_when_rendering_then_labels_are_stable() {
    assert_eq!(ModelCapability::FineTuned.as_str(), "fine_tuned");
    assert_eq!(ModelCapability::Fallback.as_str(), "fallback");
    assert_eq!(ModelCapability::HeuristicOnly.as_str(), "heuristic_only");
}
