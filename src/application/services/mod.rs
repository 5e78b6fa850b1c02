mod analysis_service;
mod feature_extractor;
mod heuristic_scorer;

pub use analysis_service::{fuse_verdicts, AnalysisError, AnalysisService};
pub use feature_extractor::{FeatureError, FeatureExtractor};
pub use heuristic_scorer::{HeuristicScorer, HeuristicThresholds};
