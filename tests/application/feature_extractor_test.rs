use amdetect::application::services::{FeatureError, FeatureExtractor};
use amdetect::domain::{AudioSample, SAMPLE_RATE};

use crate::helpers::sine_pcm;

#[test]
fn given_one_second_sine_when_extracting_then_duration_is_one_second() {
    let sample = AudioSample::from_pcm(sine_pcm(440.0, 1.0, SAMPLE_RATE)).unwrap();
    let features = FeatureExtractor::new().extract(&sample).unwrap();

    assert!((features.duration - 1.0).abs() < 0.01);
}

#[test]
fn given_pure_tone_when_extracting_then_centroid_tracks_the_tone_frequency() {
    let sample = AudioSample::from_pcm(sine_pcm(440.0, 1.0, SAMPLE_RATE)).unwrap();
    let features = FeatureExtractor::new().extract(&sample).unwrap();

    assert!(
        features.spectral_centroid_mean > 300.0 && features.spectral_centroid_mean < 700.0,
        "centroid {} should sit near 440 Hz",
        features.spectral_centroid_mean
    );
    assert!(
        features.rolloff_mean > 300.0 && features.rolloff_mean < 700.0,
        "rolloff {} should sit near 440 Hz",
        features.rolloff_mean
    );
}

#[test]
fn given_pure_tone_when_extracting_then_zcr_matches_twice_the_frequency() {
    let sample = AudioSample::from_pcm(sine_pcm(440.0, 1.0, SAMPLE_RATE)).unwrap();
    let features = FeatureExtractor::new().extract(&sample).unwrap();

    // A 440 Hz sine crosses zero 880 times per second: 880/16000 = 0.055
    assert!(
        features.zcr_mean > 0.04 && features.zcr_mean < 0.07,
        "zcr_mean {} should be near 0.055",
        features.zcr_mean
    );
}

#[test]
fn given_stationary_tone_when_extracting_then_spectral_deviation_is_small() {
    let sample = AudioSample::from_pcm(sine_pcm(440.0, 1.0, SAMPLE_RATE)).unwrap();
    let features = FeatureExtractor::new().extract(&sample).unwrap();

    assert!(features.spectral_centroid_std < 100.0);
    assert!(features.zcr_std < 0.05);
}

#[test]
fn given_same_waveform_when_extracting_twice_then_features_are_identical() {
    let sample = AudioSample::from_pcm(sine_pcm(220.0, 0.5, SAMPLE_RATE)).unwrap();
    let extractor = FeatureExtractor::new();

    assert_eq!(
        extractor.extract(&sample).unwrap(),
        extractor.extract(&sample).unwrap()
    );
}

#[test]
fn given_sub_frame_waveform_when_extracting_then_returns_too_short_error() {
    let sample = AudioSample::from_pcm(vec![0.5; 1000]).unwrap();
    let result = FeatureExtractor::new().extract(&sample);

    assert!(matches!(result, Err(FeatureError::TooShort { .. })));
}

#[test]
fn given_mixed_tones_when_extracting_then_mfcc_statistics_are_finite() {
    let mut pcm = sine_pcm(300.0, 1.0, SAMPLE_RATE);
    for (i, s) in sine_pcm(2500.0, 1.0, SAMPLE_RATE).iter().enumerate() {
        pcm[i] = (pcm[i] + s) / 2.0;
    }
    let sample = AudioSample::from_pcm(pcm).unwrap();
    let features = FeatureExtractor::new().extract(&sample).unwrap();

    assert!(features.mfcc_mean.is_finite());
    assert!(features.mfcc_std.is_finite());
    assert!(features.mfcc_std >= 0.0);
}
