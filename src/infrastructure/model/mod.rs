mod candle_engine;
mod inference_context;
mod wav2vec2;

pub use candle_engine::CandleAmdEngine;
pub use inference_context::{InferenceContext, ModelCapability};
pub use wav2vec2::{Wav2Vec2Config, Wav2Vec2SequenceClassifier};
