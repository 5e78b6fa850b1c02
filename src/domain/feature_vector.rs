/// Scalar acoustic features computed once per request from an
/// [`crate::domain::AudioSample`], consumed by the heuristic scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Mean zero-crossing rate across analysis frames.
    pub zcr_mean: f32,
    /// Standard deviation of the zero-crossing rate across frames.
    pub zcr_std: f32,
    /// Mean spectral centroid in Hz.
    pub spectral_centroid_mean: f32,
    /// Standard deviation of the spectral centroid in Hz.
    pub spectral_centroid_std: f32,
    /// Mean spectral rolloff frequency in Hz (85% cumulative magnitude).
    pub rolloff_mean: f32,
    /// Mean over the full MFCC matrix (13 coefficients per frame).
    pub mfcc_mean: f32,
    /// Standard deviation over the full MFCC matrix.
    pub mfcc_std: f32,
    /// Clip duration in seconds.
    pub duration: f32,
    /// Standard deviation of per-frame energy.
    pub energy_variation: f32,
}
