/// Sample rate every waveform is resampled to before analysis.
pub const SAMPLE_RATE: u32 = 16_000;

/// A mono waveform at [`SAMPLE_RATE`], peak-normalized to amplitude 1.0.
///
/// Constructed once per request from decoded PCM and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSample {
    samples: Vec<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioSampleError {
    #[error("audio contains no samples")]
    Empty,
    #[error("audio is silent, peak amplitude is zero")]
    Silent,
}

impl AudioSample {
    /// Normalize raw PCM to peak amplitude 1.0.
    ///
    /// Zero-amplitude input is rejected before the division so silence can
    /// never produce NaN samples downstream.
    pub fn from_pcm(samples: Vec<f32>) -> Result<Self, AudioSampleError> {
        if samples.is_empty() {
            return Err(AudioSampleError::Empty);
        }

        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        if peak == 0.0 {
            return Err(AudioSampleError::Silent);
        }

        let samples = samples.into_iter().map(|s| s / peak).collect();
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / SAMPLE_RATE as f32
    }
}
