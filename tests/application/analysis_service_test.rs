use std::sync::Arc;

use amdetect::application::ports::{
    AmdModel, AudioDecoder, AudioDecoderError, ModelError, ModelPrediction,
};
use amdetect::application::services::{fuse_verdicts, AnalysisError, AnalysisService, HeuristicScorer};
use amdetect::domain::{AudioSample, Label, Verdict, SAMPLE_RATE};

use crate::helpers::sine_pcm;

/// Hands back a fixed waveform regardless of input bytes.
struct StubDecoder {
    pcm: Vec<f32>,
}

impl AudioDecoder for StubDecoder {
    fn decode(&self, _data: &[u8]) -> Result<Vec<f32>, AudioDecoderError> {
        Ok(self.pcm.clone())
    }
}

struct FixedModel {
    prediction: ModelPrediction,
}

impl AmdModel for FixedModel {
    fn classify(&self, _sample: &AudioSample) -> Result<ModelPrediction, ModelError> {
        Ok(self.prediction)
    }
}

struct BrokenModel;

impl AmdModel for BrokenModel {
    fn classify(&self, _sample: &AudioSample) -> Result<ModelPrediction, ModelError> {
        Err(ModelError::InferenceFailed("tensor shape mismatch".to_string()))
    }
}

fn service_with(model: Option<Arc<dyn AmdModel>>, pcm: Vec<f32>) -> AnalysisService {
    AnalysisService::new(
        Arc::new(StubDecoder { pcm }),
        model,
        HeuristicScorer::default(),
    )
}

#[test]
fn given_heuristic_confidence_when_fusing_then_confidences_average_and_model_label_wins() {
    let heuristic = Verdict {
        label: Label::Machine,
        confidence: 0.2,
    };
    let model = ModelPrediction {
        label: Label::Human,
        confidence: 0.9,
    };

    let fused = fuse_verdicts(&heuristic, model);

    assert_eq!(fused.label, Label::Human);
    assert!((fused.confidence - 0.55).abs() < 1e-6);
}

#[test]
fn given_confident_heuristic_when_fusing_then_model_label_still_overrides() {
    let heuristic = Verdict {
        label: Label::Human,
        confidence: 1.0,
    };
    let model = ModelPrediction {
        label: Label::Machine,
        confidence: 0.51,
    };

    let fused = fuse_verdicts(&heuristic, model);

    assert_eq!(fused.label, Label::Machine);
    assert!((fused.confidence - 0.755).abs() < 1e-6);
}

#[test]
fn given_failing_model_when_analyzing_then_result_equals_heuristic_only() {
    let pcm = sine_pcm(440.0, 2.5, SAMPLE_RATE);

    let with_broken_model = service_with(Some(Arc::new(BrokenModel)), pcm.clone());
    let heuristic_only = service_with(None, pcm);

    assert_eq!(
        with_broken_model.analyze(b"ignored").unwrap(),
        heuristic_only.analyze(b"ignored").unwrap()
    );
}

#[test]
fn given_working_model_when_analyzing_then_verdict_blends_model_and_heuristic() {
    let pcm = sine_pcm(440.0, 2.5, SAMPLE_RATE);
    let heuristic = service_with(None, pcm.clone()).analyze(b"ignored").unwrap();

    let model = FixedModel {
        prediction: ModelPrediction {
            label: Label::Human,
            confidence: 0.9,
        },
    };
    let fused = service_with(Some(Arc::new(model)), pcm)
        .analyze(b"ignored")
        .unwrap();

    assert_eq!(fused.label, Label::Human);
    assert!((fused.confidence - (heuristic.confidence + 0.9) / 2.0).abs() < 1e-6);
}

#[test]
fn given_empty_waveform_when_analyzing_then_fails_before_scoring() {
    let service = service_with(None, Vec::new());

    let result = service.analyze(b"ignored");

    assert!(matches!(result, Err(AnalysisError::Preprocess(_))));
}

#[test]
fn given_silent_waveform_when_analyzing_then_fails_before_scoring() {
    let service = service_with(None, vec![0.0; SAMPLE_RATE as usize]);

    let result = service.analyze(b"ignored");

    assert!(matches!(result, Err(AnalysisError::Preprocess(_))));
}
