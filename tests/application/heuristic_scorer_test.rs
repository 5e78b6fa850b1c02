use amdetect::application::services::HeuristicScorer;
use amdetect::domain::{FeatureVector, Label};

fn features(
    duration: f32,
    energy_variation: f32,
    zcr_std: f32,
    spectral_centroid_std: f32,
) -> FeatureVector {
    FeatureVector {
        zcr_mean: 0.05,
        zcr_std,
        spectral_centroid_mean: 1500.0,
        spectral_centroid_std,
        rolloff_mean: 3000.0,
        mfcc_mean: -5.0,
        mfcc_std: 12.0,
        duration,
        energy_variation,
    }
}

#[test]
fn given_long_flat_recording_when_scoring_then_clamps_to_certain_machine() {
    let scorer = HeuristicScorer::default();

    // 0.5 - 0.2 (long) - 0.2 (flat energy) + 0.1 (zcr) - 0.1 (flat
    // centroid) - 0.3 (very long) = -0.2, clamped to 0.0
    let verdict = scorer.score(&features(10.0, 0.001, 0.2, 50.0));

    assert_eq!(verdict.label, Label::Machine);
    assert!((verdict.confidence - 1.0).abs() < 1e-6);
}

#[test]
fn given_typical_human_greeting_when_scoring_then_leans_human() {
    let scorer = HeuristicScorer::default();

    // Only the typical-duration rule fires: 0.5 + 0.1 = 0.6
    let verdict = scorer.score(&features(2.5, 0.5, 0.01, 500.0));

    assert_eq!(verdict.label, Label::Human);
    assert!((verdict.confidence - 0.2).abs() < 1e-6);
}

#[test]
fn given_neutral_features_when_scoring_then_midpoint_maps_to_machine_with_zero_confidence() {
    let scorer = HeuristicScorer::default();

    // No rule fires, score stays at the 0.5 midpoint
    let verdict = scorer.score(&features(1.0, 0.5, 0.01, 500.0));

    assert_eq!(verdict.label, Label::Machine);
    assert!(verdict.confidence < 1e-6);
}

#[test]
fn given_identical_features_when_scoring_twice_then_verdicts_are_identical() {
    let scorer = HeuristicScorer::default();
    let input = features(4.2, 0.003, 0.07, 80.0);

    assert_eq!(scorer.score(&input), scorer.score(&input));
}

#[test]
fn given_any_feature_combination_when_scoring_then_confidence_stays_in_unit_interval() {
    let scorer = HeuristicScorer::default();

    for &duration in &[0.5, 2.5, 4.0, 6.0, 9.0, 20.0] {
        for &energy in &[0.0, 0.005, 0.5] {
            for &zcr_std in &[0.0, 0.06, 0.3] {
                for &centroid_std in &[10.0, 150.0, 900.0] {
                    let verdict = scorer.score(&features(duration, energy, zcr_std, centroid_std));
                    assert!(
                        (0.0..=1.0).contains(&verdict.confidence),
                        "confidence {} out of range for duration {}",
                        verdict.confidence,
                        duration
                    );
                }
            }
        }
    }
}

#[test]
fn given_both_duration_penalties_when_scoring_then_they_stack() {
    let scorer = HeuristicScorer::default();

    // duration 9.0 fires both the >3s and >8s rules: 0.5 - 0.2 - 0.3 = 0.0
    let verdict = scorer.score(&features(9.0, 0.5, 0.01, 500.0));

    assert_eq!(verdict.label, Label::Machine);
    assert!((verdict.confidence - 1.0).abs() < 1e-6);
}
