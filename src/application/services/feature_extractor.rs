use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::domain::{AudioSample, FeatureVector, SAMPLE_RATE};

/// Analysis frame length in samples (128 ms at 16 kHz).
pub const FRAME_LENGTH: usize = 2048;
/// Hop between consecutive frames in samples.
pub const HOP_LENGTH: usize = 512;

const N_MELS: usize = 128;
const N_MFCC: usize = 13;
const ROLLOFF_PERCENT: f32 = 0.85;

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("audio too short for analysis: {samples} samples, need at least {required}")]
    TooShort { samples: usize, required: usize },
}

/// Computes the acoustic [`FeatureVector`] consumed by the heuristic scorer.
///
/// Pure and deterministic: the same waveform always yields the same features.
/// The FFT plan, Hann window, mel filterbank and DCT basis are precomputed
/// once and shared across requests.
pub struct FeatureExtractor {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    mel_filterbank: Vec<Vec<f32>>,
    dct_basis: Vec<Vec<f32>>,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FRAME_LENGTH);

        let window = (0..FRAME_LENGTH)
            .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / FRAME_LENGTH as f32).cos())
            .collect();

        Self {
            fft,
            window,
            mel_filterbank: mel_filterbank(N_MELS, FRAME_LENGTH, SAMPLE_RATE),
            dct_basis: dct_ii_basis(N_MFCC, N_MELS),
        }
    }

    pub fn extract(&self, sample: &AudioSample) -> Result<FeatureVector, FeatureError> {
        let samples = sample.samples();
        if samples.len() < FRAME_LENGTH {
            return Err(FeatureError::TooShort {
                samples: samples.len(),
                required: FRAME_LENGTH,
            });
        }

        let frames: Vec<&[f32]> = samples
            .windows(FRAME_LENGTH)
            .step_by(HOP_LENGTH)
            .collect();

        let mut zcr = Vec::with_capacity(frames.len());
        let mut centroids = Vec::with_capacity(frames.len());
        let mut rolloffs = Vec::with_capacity(frames.len());
        let mut energies = Vec::with_capacity(frames.len());
        let mut mfcc_values = Vec::with_capacity(frames.len() * N_MFCC);

        let mut spectrum = vec![Complex::new(0.0f32, 0.0); FRAME_LENGTH];
        let bin_hz = SAMPLE_RATE as f32 / FRAME_LENGTH as f32;

        for frame in &frames {
            zcr.push(zero_crossing_rate(frame));
            energies.push(frame.iter().map(|s| s * s).sum::<f32>());

            for (i, (&s, &w)) in frame.iter().zip(&self.window).enumerate() {
                spectrum[i] = Complex::new(s * w, 0.0);
            }
            self.fft.process(&mut spectrum);

            let magnitudes: Vec<f32> = spectrum[..FRAME_LENGTH / 2 + 1]
                .iter()
                .map(|c| c.norm())
                .collect();

            centroids.push(spectral_centroid(&magnitudes, bin_hz));
            rolloffs.push(spectral_rolloff(&magnitudes, bin_hz));
            mfcc_values.extend(self.mfcc(&magnitudes));
        }

        Ok(FeatureVector {
            zcr_mean: mean(&zcr),
            zcr_std: std_dev(&zcr),
            spectral_centroid_mean: mean(&centroids),
            spectral_centroid_std: std_dev(&centroids),
            rolloff_mean: mean(&rolloffs),
            mfcc_mean: mean(&mfcc_values),
            mfcc_std: std_dev(&mfcc_values),
            duration: sample.duration_secs(),
            energy_variation: std_dev(&energies),
        })
    }

    /// First [`N_MFCC`] cepstral coefficients of one frame's magnitude
    /// spectrum: mel-weighted log power followed by an orthonormal DCT-II.
    fn mfcc(&self, magnitudes: &[f32]) -> Vec<f32> {
        let log_mel: Vec<f32> = self
            .mel_filterbank
            .iter()
            .map(|filter| {
                let power: f32 = filter
                    .iter()
                    .zip(magnitudes)
                    .map(|(&w, &m)| w * m * m)
                    .sum();
                10.0 * power.max(1e-10).log10()
            })
            .collect();

        self.dct_basis
            .iter()
            .map(|row| row.iter().zip(&log_mel).map(|(&b, &v)| b * v).sum())
            .collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of adjacent sample pairs that change sign within the frame.
fn zero_crossing_rate(frame: &[f32]) -> f32 {
    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f32 / frame.len() as f32
}

fn spectral_centroid(magnitudes: &[f32], bin_hz: f32) -> f32 {
    let total: f32 = magnitudes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let weighted: f32 = magnitudes
        .iter()
        .enumerate()
        .map(|(k, &m)| k as f32 * bin_hz * m)
        .sum();
    weighted / total
}

/// Lowest frequency below which [`ROLLOFF_PERCENT`] of the spectral
/// magnitude is concentrated.
fn spectral_rolloff(magnitudes: &[f32], bin_hz: f32) -> f32 {
    let total: f32 = magnitudes.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let threshold = ROLLOFF_PERCENT * total;
    let mut cumulative = 0.0;
    for (k, &m) in magnitudes.iter().enumerate() {
        cumulative += m;
        if cumulative >= threshold {
            return k as f32 * bin_hz;
        }
    }
    (magnitudes.len() - 1) as f32 * bin_hz
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank over the one-sided spectrum, `n_mels` filters
/// spaced evenly on the mel scale between 0 Hz and Nyquist.
fn mel_filterbank(n_mels: usize, n_fft: usize, sample_rate: u32) -> Vec<Vec<f32>> {
    let n_bins = n_fft / 2 + 1;
    let bin_hz = sample_rate as f32 / n_fft as f32;
    let max_mel = hz_to_mel(sample_rate as f32 / 2.0);

    let edges: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_to_hz(max_mel * i as f32 / (n_mels + 1) as f32))
        .collect();

    (0..n_mels)
        .map(|m| {
            let (lower, center, upper) = (edges[m], edges[m + 1], edges[m + 2]);
            (0..n_bins)
                .map(|k| {
                    let hz = k as f32 * bin_hz;
                    if hz <= lower || hz >= upper {
                        0.0
                    } else if hz <= center {
                        (hz - lower) / (center - lower)
                    } else {
                        (upper - hz) / (upper - center)
                    }
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II basis, `n_out` rows over `n_in` inputs.
fn dct_ii_basis(n_out: usize, n_in: usize) -> Vec<Vec<f32>> {
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n_in as f32).sqrt()
            } else {
                (2.0 / n_in as f32).sqrt()
            };
            (0..n_in)
                .map(|n| scale * (PI * (n as f32 + 0.5) * k as f32 / n_in as f32).cos())
                .collect()
        })
        .collect()
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

fn std_dev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}
