mod audio_sample;
mod feature_vector;
mod verdict;

pub use audio_sample::{AudioSample, AudioSampleError, SAMPLE_RATE};
pub use feature_vector::FeatureVector;
pub use verdict::{Label, Verdict};
